//! CPU reference of the terrain shading math.
//!
//! The WGSL shaders evaluate this with hardware derivatives; these
//! functions take the derivative magnitudes as explicit arguments so the
//! same math runs deterministically on the CPU. Diagnostics and tests
//! probe these, and the shader source mirrors them term for term.

use glam::Vec3;
use neondrift_scene::Spotlight;
use std::f32::consts::{PI, TAU};

/// GLSL-style smoothstep with hermite interpolation.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Raised-cosine line signal along one grid axis.
///
/// Zero exactly at every multiple of `1 / frequency`, rising to 2 midway
/// between lines. The anti-aliased step picks out the zeros as lines.
pub fn grid_axis_signal(x: f32, frequency: f32) -> f32 {
    1.0 + (x * frequency * TAU - PI).cos()
}

/// Anti-aliased step: 1 where `value` sits below `threshold`, feathered
/// over the signal's screen-space footprint.
///
/// `dfdx`/`dfdy` are the per-pixel derivatives of `value`. With both zero
/// the feather collapses to a hard step.
pub fn aastep(threshold: f32, value: f32, dfdx: f32, dfdy: f32) -> f32 {
    let afwidth = (dfdx * dfdx + dfdy * dfdy).sqrt() * std::f32::consts::FRAC_1_SQRT_2;
    1.0 - smoothstep(threshold - afwidth, threshold + afwidth, value)
}

/// Line coverage along one axis at coordinate `x`, where `dx` is the UV
/// step one pixel makes along that axis. Forward differences stand in for
/// the GPU's dFdx.
fn axis_mask(x: f32, dx: f32, frequency: f32) -> f32 {
    let signal = grid_axis_signal(x, frequency);
    // Threshold tracks the footprint of the scaled coordinate, so line
    // width stays near one pixel at any viewing distance.
    let threshold = frequency * dx.abs();
    let dfdx = grid_axis_signal(x + dx, frequency) - signal;
    aastep(threshold, signal, dfdx, 0.0)
}

/// Combined grid coverage at UV `(u, v)` with per-pixel UV derivatives
/// `(du, dv)`. Crossings sum above 1 and read hotter, which the bloom
/// pass turns into glow.
pub fn grid_mask(u: f32, v: f32, du: f32, dv: f32, frequency: f32) -> f32 {
    axis_mask(u, du, frequency) + axis_mask(v, dv, frequency)
}

/// Grid coverage to linear RGB: full red, dimmed green, half blue.
pub fn grid_color(mask: f32) -> [f32; 3] {
    [mask, mask * 0.3, mask * 0.5]
}

/// Piecewise linear-to-sRGB transfer for one channel, input clamped to
/// `[0, 1]`. The display surface is configured linear, so this runs as
/// its own pass instead of in the swapchain format.
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Depth fog blend factor: 0 at `near` and closer, 1 at `far` and beyond,
/// hermite in between. The frame color is mixed toward the fog color by
/// this amount.
pub fn fog_factor(depth: f32, near: f32, far: f32) -> f32 {
    smoothstep(near, far, depth)
}

/// Radial spotlight falloff: full at the light, zero at `falloff` and
/// beyond, shaped by the `decay` exponent.
pub fn distance_attenuation(distance: f32, falloff: f32, decay: f32) -> f32 {
    (1.0 - distance / falloff).max(0.0).powf(decay)
}

/// Cone edge falloff from the cosine of the angle between the cone axis
/// and the fragment direction. Fades across the outer `penumbra` fraction
/// of the cone angle.
pub fn cone_attenuation(cos_angle: f32, cone_angle: f32, penumbra: f32) -> f32 {
    let cos_outer = cone_angle.cos();
    let cos_inner = (cone_angle * (1.0 - penumbra)).cos();
    smoothstep(cos_outer, cos_inner, cos_angle)
}

/// Total scalar contribution of one spotlight at a world-space point:
/// distance falloff times cone falloff. Geometry terms (N.L, specular)
/// are applied by the shader on top of this.
pub fn spotlight_weight(light: &Spotlight, point: Vec3) -> f32 {
    let to_point = point - light.position;
    let distance = to_point.length();
    if distance <= f32::EPSILON {
        return 1.0;
    }
    let axis = (light.target - light.position).normalize();
    let cos_angle = (to_point / distance).dot(axis);
    distance_attenuation(distance, light.falloff_distance, light.decay)
        * cone_attenuation(cos_angle, light.cone_angle, light.penumbra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neondrift_scene::LightRig;

    const FREQ: f32 = 24.0;

    #[test]
    fn signal_is_zero_on_line_centers() {
        for k in 0..48 {
            let x = k as f32 / FREQ;
            assert!(grid_axis_signal(x, FREQ).abs() < 1e-4, "line at {x}");
        }
    }

    #[test]
    fn signal_peaks_between_lines() {
        let x = 0.5 / FREQ;
        assert!((grid_axis_signal(x, FREQ) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn mask_is_full_on_a_line_and_empty_between() {
        let px = 1.0 / 1024.0;
        let on_line = grid_mask(10.0 / FREQ, 0.5 / FREQ, px, px, FREQ);
        assert!(on_line > 0.9, "on-line coverage {on_line}");

        let between = grid_mask(10.5 / FREQ, 0.5 / FREQ, px, px, FREQ);
        assert!(between < 0.1, "between-line coverage {between}");
    }

    #[test]
    fn crossings_run_hotter_than_single_lines() {
        let px = 1.0 / 1024.0;
        let crossing = grid_mask(0.0, 0.0, px, px, FREQ);
        let line = grid_mask(0.0, 0.5 / FREQ, px, px, FREQ);
        assert!(crossing > line);
    }

    #[test]
    fn mask_is_deterministic() {
        let a = grid_mask(0.12345, 0.6789, 0.001, 0.002, FREQ);
        let b = grid_mask(0.12345, 0.6789, 0.001, 0.002, FREQ);
        assert_eq!(a, b);
    }

    #[test]
    fn pattern_repeats_across_tile_seams() {
        // Tiles share one UV parametrization and the frequency divides the
        // tile evenly, so the two abutting edges shade identically.
        let px = 1.0 / 800.0;
        for i in 0..32 {
            let u = i as f32 / 32.0;
            let near_edge = grid_mask(u, 0.0, px, px, FREQ);
            let far_edge = grid_mask(u, 1.0, px, px, FREQ);
            assert!((near_edge - far_edge).abs() < 1e-3);
        }
    }

    #[test]
    fn aastep_with_no_footprint_is_a_hard_step() {
        assert_eq!(aastep(0.5, 0.4, 0.0, 0.0), 1.0);
        assert_eq!(aastep(0.5, 0.6, 0.0, 0.0), 0.0);
    }

    #[test]
    fn grid_color_ratios() {
        let [r, g, b] = grid_color(1.0);
        assert_eq!((r, g, b), (1.0, 0.3, 0.5));
        assert_eq!(grid_color(0.0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn srgb_transfer_endpoints_and_monotonicity() {
        assert_eq!(linear_to_srgb(0.0), 0.0);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
        // Mid grey lands near the familiar 0.735.
        assert!((linear_to_srgb(0.5) - 0.7354).abs() < 1e-3);

        let mut prev = 0.0;
        for i in 1..=100 {
            let next = linear_to_srgb(i as f32 / 100.0);
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn srgb_transfer_linear_segment() {
        let c = 0.002;
        assert_eq!(linear_to_srgb(c), c * 12.92);
    }

    #[test]
    fn srgb_transfer_clamps_out_of_range() {
        assert_eq!(linear_to_srgb(-1.0), 0.0);
        assert!((linear_to_srgb(4.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fog_ramps_between_near_and_far() {
        assert_eq!(fog_factor(0.5, 1.0, 2.5), 0.0);
        assert_eq!(fog_factor(1.0, 1.0, 2.5), 0.0);
        assert_eq!(fog_factor(2.5, 1.0, 2.5), 1.0);
        assert_eq!(fog_factor(5.0, 1.0, 2.5), 1.0);
        let mid = fog_factor(1.75, 1.0, 2.5);
        assert!((mid - 0.5).abs() < 1e-6);
    }

    #[test]
    fn distance_attenuation_falls_to_zero_at_falloff() {
        assert_eq!(distance_attenuation(0.0, 25.0, 10.0), 1.0);
        assert_eq!(distance_attenuation(25.0, 25.0, 10.0), 0.0);
        assert_eq!(distance_attenuation(40.0, 25.0, 10.0), 0.0);

        let near = distance_attenuation(1.0, 25.0, 10.0);
        let far = distance_attenuation(10.0, 25.0, 10.0);
        assert!(near > far && far > 0.0);
    }

    #[test]
    fn cone_attenuation_edges() {
        let angle = PI * 0.1;
        // Dead ahead on the axis.
        assert_eq!(cone_attenuation(1.0, angle, 0.25), 1.0);
        // Well outside the cone.
        assert_eq!(cone_attenuation((PI * 0.3).cos(), angle, 0.25), 0.0);
        // Inside the penumbra band the edge is soft.
        let inside_band = cone_attenuation((angle * 0.875).cos(), angle, 0.25);
        assert!(inside_band > 0.0 && inside_band < 1.0);
    }

    #[test]
    fn spotlight_lights_its_target() {
        let rig = LightRig::new();
        let light = &rig.lights()[0];
        let weight = spotlight_weight(light, light.target);
        assert!(weight > 0.3, "target weight {weight}");
    }

    #[test]
    fn spotlight_ignores_points_behind_it() {
        let rig = LightRig::new();
        let light = &rig.lights()[0];
        let behind = light.position + (light.position - light.target);
        assert_eq!(spotlight_weight(light, behind), 0.0);
    }

    #[test]
    fn spotlight_fades_past_falloff_distance() {
        let rig = LightRig::new();
        let light = &rig.lights()[0];
        let axis = (light.target - light.position).normalize();
        let far_point = light.position + axis * (light.falloff_distance + 1.0);
        assert_eq!(spotlight_weight(light, far_point), 0.0);
    }

    #[test]
    fn mirrored_rig_shades_mirrored_points_equally() {
        let rig = LightRig::new();
        let [a, b] = rig.lights();
        for i in 0..20 {
            let p = Vec3::new(0.05 * i as f32 - 0.5, 0.1, 0.3);
            let mirrored = Vec3::new(-p.x, p.y, p.z);
            assert_eq!(spotlight_weight(a, p), spotlight_weight(b, mirrored));
        }
    }
}
