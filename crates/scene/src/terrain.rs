/// World-space units the terrain travels per second.
pub const SCROLL_SPEED: f64 = 0.15;

/// Depth of one terrain tile along -Z. Also the wrap period of the scroller.
pub const TILE_LENGTH: f64 = 2.0;

/// Identity of one of the two terrain tiles. Tiles are allocated once at
/// startup and keep their id for the lifetime of the scene; only their
/// offsets move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileId {
    A,
    B,
}

/// A terrain tile and its current position along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub id: TileId,
    /// Z translation applied to the tile's mesh, in world units.
    pub z_offset: f64,
}

/// Two-tile conveyor belt that fakes an endless landscape.
///
/// Both tiles ride the same phase: tile A at `(t * SCROLL_SPEED) % TILE_LENGTH`
/// and tile B exactly one tile length behind. When A's offset wraps from
/// almost `TILE_LENGTH` back to 0, B slides into the place A just vacated,
/// so the seam is never visible from the camera. Offsets are computed in
/// f64 from absolute elapsed time, which keeps the pair drift-free no
/// matter how long the scene runs.
#[derive(Debug, Clone)]
pub struct TerrainScroll {
    tiles: [Tile; 2],
}

impl Default for TerrainScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainScroll {
    /// Tiles at their t = 0 positions: A at the origin, B one length behind.
    pub fn new() -> Self {
        Self {
            tiles: [
                Tile {
                    id: TileId::A,
                    z_offset: 0.0,
                },
                Tile {
                    id: TileId::B,
                    z_offset: -TILE_LENGTH,
                },
            ],
        }
    }

    /// Recompute both offsets from absolute elapsed seconds.
    ///
    /// Deriving from absolute time instead of integrating per-frame deltas
    /// means a dropped or long frame cannot desynchronize the pair; the
    /// two offsets always differ by exactly `TILE_LENGTH`.
    pub fn update(&mut self, elapsed: f64) {
        let phase = (elapsed * SCROLL_SPEED) % TILE_LENGTH;
        self.tiles[0].z_offset = phase;
        self.tiles[1].z_offset = phase - TILE_LENGTH;
    }

    /// Both tiles, A first.
    pub fn tiles(&self) -> [Tile; 2] {
        self.tiles
    }

    /// Current state of a single tile.
    pub fn tile(&self, id: TileId) -> Tile {
        match id {
            TileId::A => self.tiles[0],
            TileId::B => self.tiles[1],
        }
    }
}

/// Which grid rendering path the terrain material uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// Analytic anti-aliased grid evaluated in the fragment shader.
    #[default]
    Procedural,
    /// Grid sampled from a texture. Simpler, but softens under minification.
    Texture,
}

/// Geometry and material constants shared by both terrain tiles.
///
/// The plane is deliberately dense (24 x 24 segments for a 1 x 2 quad) so
/// the vertex displacement reads as mountains rather than a coarse relief.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    pub style: GridStyle,
    /// Plane extent along X, in world units.
    pub width: f32,
    /// Plane extent along Z. Matches `TILE_LENGTH` so tiles abut exactly.
    pub length: f32,
    /// Subdivisions per axis.
    pub segments: u32,
    /// Grid line repetitions across one UV unit.
    pub grid_frequency: f32,
    /// Vertical scale applied to the displacement field.
    pub displacement_scale: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::for_style(GridStyle::Procedural)
    }
}

impl TerrainParams {
    /// Canonical constants for the given grid style. The textured path runs
    /// slightly more metallic to compensate for the softer grid line.
    pub fn for_style(style: GridStyle) -> Self {
        let metalness = match style {
            GridStyle::Procedural => 0.9,
            GridStyle::Texture => 0.95,
        };
        Self {
            style,
            width: 1.0,
            length: TILE_LENGTH as f32,
            segments: 24,
            grid_frequency: 24.0,
            displacement_scale: 0.4,
            metalness,
            roughness: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_start_one_length_apart() {
        let scroll = TerrainScroll::new();
        let [a, b] = scroll.tiles();
        assert_eq!(a.id, TileId::A);
        assert_eq!(b.id, TileId::B);
        assert_eq!(a.z_offset, 0.0);
        assert_eq!(b.z_offset, -TILE_LENGTH);
    }

    #[test]
    fn offsets_follow_elapsed_time() {
        let mut scroll = TerrainScroll::new();
        // 0.15 units/s for 20/3 s is exactly one world unit of travel.
        scroll.update(20.0 / 3.0);
        let [a, b] = scroll.tiles();
        assert!((a.z_offset - 1.0).abs() < 1e-9);
        assert!((b.z_offset + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pair_separation_is_exact() {
        let mut scroll = TerrainScroll::new();
        for i in 0..10_000 {
            let t = i as f64 * 0.037;
            scroll.update(t);
            let [a, b] = scroll.tiles();
            // One IEEE subtraction, so the separation is bitwise exact.
            assert_eq!(b.z_offset, a.z_offset - TILE_LENGTH);
        }
    }

    #[test]
    fn phase_wraps_at_tile_length() {
        let mut scroll = TerrainScroll::new();
        scroll.update(13.0);
        let before = scroll.tile(TileId::A).z_offset;
        assert!((before - 1.95).abs() < 1e-9);

        // 13.4 s of travel is 2.01 units, one full period plus a sliver.
        scroll.update(13.4);
        let after = scroll.tile(TileId::A).z_offset;
        assert!((after - 0.01).abs() < 1e-9);
    }

    #[test]
    fn offsets_stay_in_range() {
        let mut scroll = TerrainScroll::new();
        for i in 0..50_000 {
            scroll.update(i as f64 * 0.113);
            let [a, b] = scroll.tiles();
            assert!((0.0..TILE_LENGTH).contains(&a.z_offset));
            assert!((-TILE_LENGTH..0.0).contains(&b.z_offset));
        }
    }

    #[test]
    fn long_sessions_do_not_drift() {
        let mut scroll = TerrainScroll::new();
        // Two hours in, the phase is still derived from absolute time.
        let t = 7200.0;
        scroll.update(t);
        let expected = (t * SCROLL_SPEED) % TILE_LENGTH;
        assert_eq!(scroll.tile(TileId::A).z_offset, expected);
    }

    #[test]
    fn tile_identity_is_stable() {
        let mut scroll = TerrainScroll::new();
        for i in 0..100 {
            scroll.update(i as f64);
            let [a, b] = scroll.tiles();
            assert_eq!(a.id, TileId::A);
            assert_eq!(b.id, TileId::B);
        }
    }

    #[test]
    fn params_match_style() {
        let procedural = TerrainParams::default();
        assert_eq!(procedural.style, GridStyle::Procedural);
        assert_eq!(procedural.metalness, 0.9);

        let textured = TerrainParams::for_style(GridStyle::Texture);
        assert_eq!(textured.metalness, 0.95);
        assert_eq!(textured.roughness, procedural.roughness);
        assert_eq!(procedural.length as f64, TILE_LENGTH);
    }
}
