use bytemuck::{Pod, Zeroable};
use neondrift_scene::TerrainParams;

/// Vertex layout shared by both terrain tiles.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Subdivided plane in the XZ ground plane, centered on the origin.
///
/// X spans `[-width/2, width/2]`, Z spans `[-length/2, length/2]`. UVs run
/// 0..1 across the plane with v = 0 at the near (+Z) edge, so the grid and
/// displacement fields read the same way on every tile and the pattern
/// continues across the seam between them.
pub fn plane_mesh(params: &TerrainParams) -> (Vec<TerrainVertex>, Vec<u32>) {
    let segments = params.segments.max(1);
    let cols = segments + 1;
    let rows = segments + 1;

    let mut vertices = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        let v = row as f32 / segments as f32;
        let z = params.length / 2.0 - v * params.length;
        for col in 0..cols {
            let u = col as f32 / segments as f32;
            let x = u * params.width - params.width / 2.0;
            vertices.push(TerrainVertex {
                position: [x, 0.0, z],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for row in 0..segments {
        for col in 0..segments {
            let i = row * cols + col;
            // Counter-clockwise as seen from +Y.
            indices.push(i);
            indices.push(i + 1);
            indices.push(i + cols);
            indices.push(i + 1);
            indices.push(i + cols + 1);
            indices.push(i + cols);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_and_index_counts() {
        let params = TerrainParams::default();
        let (vertices, indices) = plane_mesh(&params);
        assert_eq!(vertices.len(), 25 * 25);
        assert_eq!(indices.len(), 24 * 24 * 6);
    }

    #[test]
    fn plane_extents_match_params() {
        let params = TerrainParams::default();
        let (vertices, _) = plane_mesh(&params);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let zs: Vec<f32> = vertices.iter().map(|v| v.position[2]).collect();
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_z = zs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_z = zs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!((min_x, max_x), (-0.5, 0.5));
        assert_eq!((min_z, max_z), (-1.0, 1.0));
    }

    #[test]
    fn plane_is_flat_before_displacement() {
        let (vertices, _) = plane_mesh(&TerrainParams::default());
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn uvs_cover_the_unit_square() {
        let (vertices, _) = plane_mesh(&TerrainParams::default());
        let first = vertices.first().unwrap();
        let last = vertices.last().unwrap();
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
        // v = 0 sits on the near (+Z) edge.
        assert_eq!(first.position[2], 1.0);
        assert_eq!(last.position[2], -1.0);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let (vertices, indices) = plane_mesh(&TerrainParams::default());
        let max = *indices.iter().max().unwrap();
        assert!((max as usize) < vertices.len());
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_above() {
        let (vertices, indices) = plane_mesh(&TerrainParams::default());
        // Cross product of the first triangle's edges points up.
        let a = glam::Vec3::from(vertices[indices[0] as usize].position);
        let b = glam::Vec3::from(vertices[indices[1] as usize].position);
        let c = glam::Vec3::from(vertices[indices[2] as usize].position);
        let normal = (b - a).cross(c - a);
        assert!(normal.y > 0.0);
    }
}
