use glam::Vec3;
use neondrift_common::Rgb;
use std::f32::consts::PI;

/// A cone light with distance falloff, matching the classic spotlight model:
/// intensity fades to zero at `falloff_distance` raised by `decay`, and the
/// cone edge softens over the outer `penumbra` fraction of `cone_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
    /// Point the cone axis passes through.
    pub target: Vec3,
    /// Distance at which the light contributes nothing.
    pub falloff_distance: f32,
    /// Half-angle of the cone, in radians.
    pub cone_angle: f32,
    /// Fraction of the cone angle over which the edge fades, in `[0, 1]`.
    pub penumbra: f32,
    /// Exponent shaping the radial falloff curve.
    pub decay: f32,
}

/// The two crossed spotlights that wash the landscape in red.
///
/// Both sit above and behind the camera, mirrored across the X axis, and
/// each aims past the centerline at the far side of the terrain. The rig
/// is static; nothing here animates.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: [Spotlight; 2],
}

/// Shared neon-red color of both spotlights.
pub const LIGHT_COLOR: Rgb = Rgb::from_hex(0xd53c3d);

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}

impl LightRig {
    pub fn new() -> Self {
        let base = Spotlight {
            color: LIGHT_COLOR,
            intensity: 40.0,
            position: Vec3::new(0.5, 0.75, 2.1),
            target: Vec3::new(-0.25, 0.25, 0.25),
            falloff_distance: 25.0,
            cone_angle: PI * 0.1,
            penumbra: 0.25,
            decay: 10.0,
        };
        let mirrored = Spotlight {
            position: Vec3::new(-base.position.x, base.position.y, base.position.z),
            target: Vec3::new(-base.target.x, base.target.y, base.target.z),
            ..base
        };
        Self {
            lights: [base, mirrored],
        }
    }

    pub fn lights(&self) -> &[Spotlight; 2] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_is_mirrored_across_x() {
        let rig = LightRig::new();
        let [a, b] = rig.lights();
        assert_eq!(a.position.x, -b.position.x);
        assert_eq!(a.position.y, b.position.y);
        assert_eq!(a.position.z, b.position.z);
        assert_eq!(a.target.x, -b.target.x);
        assert_eq!(a.target.y, b.target.y);
    }

    #[test]
    fn lights_aim_across_the_centerline() {
        let rig = LightRig::new();
        for light in rig.lights() {
            // Each cone crosses x = 0 on its way to the target.
            assert!(light.position.x * light.target.x < 0.0);
        }
    }

    #[test]
    fn rig_constants_are_shared() {
        let rig = LightRig::new();
        let [a, b] = rig.lights();
        assert_eq!(a.color, LIGHT_COLOR);
        assert_eq!(a.color, b.color);
        assert_eq!(a.intensity, b.intensity);
        assert_eq!(a.cone_angle, b.cone_angle);
        assert_eq!(a.penumbra, 0.25);
        assert_eq!(a.decay, 10.0);
        assert_eq!(a.falloff_distance, 25.0);
    }

    #[test]
    fn cone_angle_is_a_tenth_turn() {
        let rig = LightRig::new();
        assert!((rig.lights()[0].cone_angle - 0.314_159_27).abs() < 1e-6);
    }
}
