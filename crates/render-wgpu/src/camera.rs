use glam::{Mat4, Vec3};
use neondrift_scene::CameraPose;

/// Orbit camera around a fixed target, driven by drag and wheel input.
/// Camera motion lives outside the scene kernel; nothing downstream of the
/// clock depends on where the viewer happens to look.
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl OrbitCamera {
    /// Place the orbit on the given pose: distance and angles are derived
    /// so that `position()` starts exactly at `pose.position`.
    pub fn from_pose(pose: &CameraPose, aspect: f32) -> Self {
        let offset = pose.position - pose.target;
        let distance = offset.length().max(1e-4);
        let pitch = (offset.y / distance).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            target: pose.target,
            distance,
            yaw,
            pitch,
            fov_y: pose.fov_y_degrees.to_radians(),
            aspect,
            near: pose.near,
            far: pose.far,
            sensitivity: 0.005,
        }
    }

    /// Current eye position on the orbit sphere.
    pub fn position(&self) -> Vec3 {
        let radial = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + radial * self.distance
    }

    /// Drag rotation in pixels. Pitch is clamped short of the poles to keep
    /// the view matrix well defined.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Wheel zoom. Positive `delta` moves in. Exponential steps keep the
    /// feel consistent at any distance; the range stays inside the near and
    /// far planes.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.1, 15.0);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_orbit() -> OrbitCamera {
        OrbitCamera::from_pose(&CameraPose::default(), 16.0 / 9.0)
    }

    #[test]
    fn orbit_starts_on_the_pose() {
        let cam = default_orbit();
        let pose = CameraPose::default();
        assert!((cam.position() - pose.position).length() < 1e-5);
        assert_eq!(cam.target, pose.target);
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = default_orbit();
        let vp = cam.view_projection();
        for col in 0..4 {
            assert!(vp.col(col).is_finite());
        }
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut cam = default_orbit();
        let before = cam.distance();
        cam.rotate(120.0, -45.0);
        assert_ne!(cam.position(), default_orbit().position());
        assert!((cam.distance() - before).abs() < 1e-6);
        assert!(((cam.position() - cam.target).length() - before).abs() < 1e-5);
    }

    #[test]
    fn pitch_clamps_short_of_the_poles() {
        let mut cam = default_orbit();
        cam.rotate(0.0, 1e6);
        let vp = cam.view_projection();
        assert!(vp.col(0).is_finite());
        assert!(cam.position().y < cam.distance());
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut cam = default_orbit();
        for _ in 0..200 {
            cam.zoom(1.0);
        }
        assert!(cam.distance() >= 0.1);
        for _ in 0..200 {
            cam.zoom(-1.0);
        }
        assert!(cam.distance() <= 15.0);
    }

    #[test]
    fn aspect_feeds_projection() {
        let mut cam = default_orbit();
        cam.set_aspect(1.0);
        let square = cam.projection_matrix();
        cam.set_aspect(2.0);
        let wide = cam.projection_matrix();
        assert_ne!(square.col(0).x, wide.col(0).x);
        assert_eq!(square.col(1).y, wide.col(1).y);
    }
}
