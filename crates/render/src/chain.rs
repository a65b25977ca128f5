use neondrift_common::Viewport;

/// Chromatic aberration offset in UV units. Written into the shift pass
/// every frame; the value is asserted, never accumulated, so an external
/// mutation lasts at most one frame.
pub const CHROMATIC_SHIFT_AMOUNT: f32 = 0.0012;

/// Direction of the chromatic shift, radians. Zero keeps it horizontal.
pub const CHROMATIC_SHIFT_ANGLE: f32 = 0.0;

/// Additive weight of the blurred bloom layer in the final composite.
pub const BLOOM_STRENGTH: f32 = 0.2;

/// Blur spread of the bloom layer, in texels at the bloom resolution.
pub const BLOOM_RADIUS: f32 = 0.8;

/// Luminance floor for the bloom bright pass. Zero means every lit pixel
/// feeds the glow, which is what gives the grid its neon wash.
pub const BLOOM_THRESHOLD: f32 = 0.0;

/// The four stages of the frame pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Scene geometry, lights, and fog into an off-screen linear target.
    Base,
    /// Red/blue sampled at mirrored UV offsets.
    ChromaticShift,
    /// Linear to sRGB transfer. The surface itself stays linear.
    GammaCorrect,
    /// Bright pass, separable blur, additive composite.
    Bloom,
}

impl PassKind {
    /// Execution order. `Base` is always first and `Bloom` always last;
    /// nothing in the crate can permute this.
    pub const ORDER: [PassKind; 4] = [
        PassKind::Base,
        PassKind::ChromaticShift,
        PassKind::GammaCorrect,
        PassKind::Bloom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::Base => "base",
            PassKind::ChromaticShift => "chromatic-shift",
            PassKind::GammaCorrect => "gamma-correct",
            PassKind::Bloom => "bloom",
        }
    }

    /// Position of this pass in [`PassKind::ORDER`].
    pub fn index(self) -> usize {
        match self {
            PassKind::Base => 0,
            PassKind::ChromaticShift => 1,
            PassKind::GammaCorrect => 2,
            PassKind::Bloom => 3,
        }
    }
}

/// Tunable pass parameters. Defaults are the canonical look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    pub shift_amount: f32,
    pub shift_angle: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            shift_amount: CHROMATIC_SHIFT_AMOUNT,
            shift_angle: CHROMATIC_SHIFT_ANGLE,
            bloom_strength: BLOOM_STRENGTH,
            bloom_radius: BLOOM_RADIUS,
            bloom_threshold: BLOOM_THRESHOLD,
        }
    }
}

/// One pipeline stage and the buffer size it currently targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pass {
    pub kind: PassKind,
    /// Render target extent in physical pixels.
    pub extent: [u32; 2],
}

/// Per-frame parameter snapshot consumed by the GPU stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub shift_amount: f32,
    pub shift_angle: f32,
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
}

/// Ordered model of the four-pass frame pipeline.
///
/// This is the backend-agnostic half of the renderer: it knows the pass
/// order, the buffer sizes each pass needs for the current viewport, and
/// the uniform values to feed each stage. The wgpu stack materializes
/// textures and pipelines from it; tests exercise the sizing and ordering
/// contracts without a GPU.
#[derive(Debug, Clone)]
pub struct PassChain {
    passes: [Pass; 4],
    settings: EffectSettings,
}

impl PassChain {
    /// Build the chain sized for `viewport`, in canonical order.
    pub fn new(viewport: Viewport) -> Self {
        let extent = viewport.render_extent();
        let passes = PassKind::ORDER.map(|kind| Pass { kind, extent });
        Self {
            passes,
            settings: EffectSettings::default(),
        }
    }

    /// Resize every pass to the new viewport in one step, so no frame can
    /// observe a chain with mixed buffer sizes.
    pub fn resize(&mut self, viewport: Viewport) {
        let extent = viewport.render_extent();
        for pass in &mut self.passes {
            pass.extent = extent;
        }
        tracing::debug!(width = extent[0], height = extent[1], "pass chain resized");
    }

    /// All four passes in execution order.
    pub fn passes(&self) -> &[Pass; 4] {
        &self.passes
    }

    /// A single pass by kind.
    pub fn pass(&self, kind: PassKind) -> &Pass {
        &self.passes[kind.index()]
    }

    /// Full-resolution extent the chain is currently sized for.
    pub fn extent(&self) -> [u32; 2] {
        self.passes[0].extent
    }

    /// Extent of the bloom blur targets: half resolution on both axes,
    /// never below one pixel, so the viewport aspect carries through.
    pub fn bloom_extent(&self) -> [u32; 2] {
        let [w, h] = self.extent();
        [(w / 2).max(1), (h / 2).max(1)]
    }

    /// Parameters for the frame about to render.
    ///
    /// Re-asserts the chromatic shift amount and angle before returning,
    /// so any out-of-band mutation holds for at most one frame.
    pub fn frame_params(&mut self) -> FrameParams {
        self.settings.shift_amount = CHROMATIC_SHIFT_AMOUNT;
        self.settings.shift_angle = CHROMATIC_SHIFT_ANGLE;
        FrameParams {
            shift_amount: self.settings.shift_amount,
            shift_angle: self.settings.shift_angle,
            bloom_strength: self.settings.bloom_strength,
            bloom_radius: self.settings.bloom_radius,
            bloom_threshold: self.settings.bloom_threshold,
        }
    }

    /// Named uniform values for one stage, as the shaders see them.
    pub fn uniform_block(&self, kind: PassKind) -> Vec<(&'static str, f32)> {
        match kind {
            PassKind::Base => Vec::new(),
            PassKind::ChromaticShift => vec![
                ("amount", self.settings.shift_amount),
                ("angle", self.settings.shift_angle),
            ],
            PassKind::GammaCorrect => Vec::new(),
            PassKind::Bloom => vec![
                ("strength", self.settings.bloom_strength),
                ("radius", self.settings.bloom_radius),
                ("threshold", self.settings.bloom_threshold),
            ],
        }
    }

    pub fn settings(&self) -> &EffectSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EffectSettings {
        &mut self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order_is_fixed() {
        let chain = PassChain::new(Viewport::default());
        let kinds: Vec<PassKind> = chain.passes().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, PassKind::ORDER.to_vec());
        assert_eq!(chain.passes()[0].kind, PassKind::Base);
        assert_eq!(chain.passes()[3].kind, PassKind::Bloom);
    }

    #[test]
    fn passes_size_from_viewport() {
        let chain = PassChain::new(Viewport::new(800, 600, 1.0));
        for pass in chain.passes() {
            assert_eq!(pass.extent, [800, 600]);
        }
    }

    #[test]
    fn pixel_density_scales_every_pass() {
        let chain = PassChain::new(Viewport::new(800, 600, 2.0));
        for pass in chain.passes() {
            assert_eq!(pass.extent, [1600, 1200]);
        }
        // Density above the clamp behaves like exactly 2.
        let clamped = PassChain::new(Viewport::new(800, 600, 3.0));
        assert_eq!(clamped.extent(), [1600, 1200]);
    }

    #[test]
    fn resize_updates_all_passes_at_once() {
        let mut chain = PassChain::new(Viewport::new(800, 600, 1.0));
        chain.resize(Viewport::new(1920, 1080, 1.0));
        for pass in chain.passes() {
            assert_eq!(pass.extent, [1920, 1080]);
        }
    }

    #[test]
    fn bloom_targets_halve_and_keep_aspect() {
        let chain = PassChain::new(Viewport::new(1600, 900, 1.0));
        assert_eq!(chain.bloom_extent(), [800, 450]);

        let full = chain.extent();
        let half = chain.bloom_extent();
        let full_aspect = full[0] as f32 / full[1] as f32;
        let half_aspect = half[0] as f32 / half[1] as f32;
        assert!((full_aspect - half_aspect).abs() < 1e-6);
    }

    #[test]
    fn bloom_extent_never_hits_zero() {
        let chain = PassChain::new(Viewport::new(1, 1, 1.0));
        assert_eq!(chain.bloom_extent(), [1, 1]);
    }

    #[test]
    fn shift_amount_reasserts_every_frame() {
        let mut chain = PassChain::new(Viewport::default());
        chain.settings_mut().shift_amount = 0.5;
        chain.settings_mut().shift_angle = 1.0;
        let params = chain.frame_params();
        assert_eq!(params.shift_amount, CHROMATIC_SHIFT_AMOUNT);
        assert_eq!(params.shift_angle, CHROMATIC_SHIFT_ANGLE);
        // The stored settings are restored too, not just the snapshot.
        assert_eq!(chain.settings().shift_amount, CHROMATIC_SHIFT_AMOUNT);
    }

    #[test]
    fn bloom_settings_survive_frame_params() {
        let mut chain = PassChain::new(Viewport::default());
        chain.settings_mut().bloom_strength = 0.9;
        let params = chain.frame_params();
        assert_eq!(params.bloom_strength, 0.9);
    }

    #[test]
    fn uniform_blocks_carry_canonical_values() {
        let chain = PassChain::new(Viewport::default());
        let shift = chain.uniform_block(PassKind::ChromaticShift);
        assert!(shift.contains(&("amount", 0.0012)));
        let bloom = chain.uniform_block(PassKind::Bloom);
        assert!(bloom.contains(&("strength", 0.2)));
        assert!(bloom.contains(&("radius", 0.8)));
        assert!(bloom.contains(&("threshold", 0.0)));
        assert!(chain.uniform_block(PassKind::Base).is_empty());
    }

    #[test]
    fn resize_then_params_reflect_new_size() {
        let mut chain = PassChain::new(Viewport::new(800, 600, 1.0));
        chain.resize(Viewport::new(1024, 768, 1.0));
        let _ = chain.frame_params();
        assert_eq!(chain.extent(), [1024, 768]);
        assert_eq!(chain.bloom_extent(), [512, 384]);
    }
}
