//! Shared leaf types for the neondrift scene.
//!
//! # Invariants
//! - Pixel density is clamped to 2.0 before any buffer is sized from it.
//! - Colors are carried in linear space; gamma encoding happens in exactly
//!   one place, the gamma-correction pass.

pub mod types;

pub use types::{MAX_PIXEL_DENSITY, Rgb, Viewport};
