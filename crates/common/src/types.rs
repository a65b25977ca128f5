use glam::Vec3;

/// Upper bound on the device pixel density the renderer will honor.
///
/// High-density displays report ratios of 3.0 and above; shading cost grows
/// with the square of the density, so the render extent is capped at 2.0.
pub const MAX_PIXEL_DENSITY: f32 = 2.0;

/// Viewport state: logical surface size plus the host-reported pixel density.
///
/// Mutated only by resize and scale-factor events. Everything that sizes a
/// render target derives from `render_extent`, never from the raw density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width in points.
    pub width: u32,
    /// Logical height in points.
    pub height: u32,
    /// Host-reported device pixel ratio (unclamped).
    pub pixel_density: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_density: f32) -> Self {
        assert!(pixel_density > 0.0, "pixel_density must be positive");
        Self {
            width,
            height,
            pixel_density,
        }
    }

    /// Build from a physical (pixel) size and the window scale factor,
    /// the form winit reports.
    pub fn from_physical(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        let sf = scale_factor.max(f64::from(f32::EPSILON)) as f32;
        Self::new(
            (physical_width as f32 / sf).round() as u32,
            (physical_height as f32 / sf).round() as u32,
            sf,
        )
    }

    /// Pixel density clamped to [`MAX_PIXEL_DENSITY`].
    pub fn clamped_density(&self) -> f32 {
        self.pixel_density.min(MAX_PIXEL_DENSITY)
    }

    /// Size of the render surface in device pixels, after the density clamp.
    /// Never returns a zero dimension; wgpu rejects empty surfaces.
    pub fn render_extent(&self) -> [u32; 2] {
        let d = self.clamped_density();
        let w = (self.width as f32 * d).round() as u32;
        let h = (self.height as f32 * d).round() as u32;
        [w.max(1), h.max(1)]
    }

    pub fn aspect_ratio(&self) -> f32 {
        let [w, h] = self.render_extent();
        w as f32 / h as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

/// A color in the renderer's working (linear, non-gamma-encoded) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_clamps_at_two() {
        let vp = Viewport::new(800, 600, 3.0);
        assert_eq!(vp.clamped_density(), 2.0);
        assert_eq!(vp.render_extent(), [1600, 1200]);
    }

    #[test]
    fn density_below_cap_is_untouched() {
        let vp = Viewport::new(800, 600, 1.5);
        assert_eq!(vp.clamped_density(), 1.5);
        assert_eq!(vp.render_extent(), [1200, 900]);
    }

    #[test]
    fn from_physical_round_trips() {
        let vp = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!(vp.width, 1280);
        assert_eq!(vp.height, 720);
        assert_eq!(vp.render_extent(), [2560, 1440]);
    }

    #[test]
    fn render_extent_never_zero() {
        let vp = Viewport::new(0, 0, 1.0);
        assert_eq!(vp.render_extent(), [1, 1]);
    }

    #[test]
    fn aspect_ratio_matches_extent() {
        let vp = Viewport::new(1920, 1080, 1.0);
        assert!((vp.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn hex_color_unpacks() {
        let c = Rgb::from_hex(0xd53c3d);
        assert!((c.r - 213.0 / 255.0).abs() < 1e-6);
        assert!((c.g - 60.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 61.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn black_is_zero() {
        assert_eq!(Rgb::BLACK.to_array(), [0.0, 0.0, 0.0]);
    }
}
