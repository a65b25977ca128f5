//! wgpu render backend for the drifting landscape.
//!
//! Renders the two displaced terrain tiles with the grid shader, then runs
//! the post chain (chromatic shift, gamma, bloom) onto the swapchain.
//! Camera uses an orbit model seeded from the scene's camera pose.
//!
//! # Invariants
//! - The renderer never mutates scene state; it reads frame snapshots.
//! - Every pass before gamma works in linear color on non-sRGB targets.
//! - Offscreen target sizes always mirror the pass-chain model.

mod camera;
mod gpu;
mod mesh;
mod post;
mod shaders;
mod terrain;

pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
pub use mesh::{plane_mesh, TerrainVertex};
pub use terrain::TerrainPipeline;
