//! Frame Pipeline Model: backend-agnostic shape of the renderer.
//!
//! # Invariants
//! - Pass order is `Base`, `ChromaticShift`, `GammaCorrect`, `Bloom` and is
//!   never permuted.
//! - A resize updates every pass's recorded extent in the same call; no
//!   frame observes a mixed-size chain.
//! - The chromatic shift amount is asserted each frame, not accumulated.
//!
//! The wgpu backend materializes textures and pipelines from this model;
//! everything here runs without a GPU so the contracts stay unit-testable.

pub mod chain;
pub mod shading;

pub use chain::{
    EffectSettings, FrameParams, Pass, PassChain, PassKind, BLOOM_RADIUS, BLOOM_STRENGTH,
    BLOOM_THRESHOLD, CHROMATIC_SHIFT_AMOUNT, CHROMATIC_SHIFT_ANGLE,
};

pub fn crate_info() -> &'static str {
    "neondrift-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
