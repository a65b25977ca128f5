//! Scene Kernel: authoritative state for the scrolling landscape.
//!
//! # Invariants
//! - Every animated quantity derives from one frame clock; there is no
//!   second time source.
//! - The two terrain tiles are created once and only ever move; their
//!   offsets always differ by exactly one tile length.
//! - All state mutations flow through explicit operations on [`Scene`];
//!   renderers read, they never write.

pub mod clock;
pub mod lights;
pub mod scene;
pub mod terrain;

pub use clock::FrameClock;
pub use lights::{LightRig, Spotlight, LIGHT_COLOR};
pub use scene::{CameraPose, Fog, FrameState, Mount, Scene, SceneError, BACKGROUND};
pub use terrain::{
    GridStyle, TerrainParams, TerrainScroll, Tile, TileId, SCROLL_SPEED, TILE_LENGTH,
};
