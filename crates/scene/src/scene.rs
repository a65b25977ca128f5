use neondrift_common::{Rgb, Viewport};
use thiserror::Error;

use crate::clock::FrameClock;
use crate::lights::LightRig;
use crate::terrain::{GridStyle, TerrainParams, TerrainScroll, Tile};

/// Background and fog color. The landscape fades into this at the horizon,
/// which is what sells the infinite-distance illusion.
pub const BACKGROUND: Rgb = Rgb::BLACK;

/// Errors from scene lifecycle and per-frame operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The scene has not been initialized yet.
    #[error("scene resources are not ready")]
    NotReady,
    /// `initialize` was called on a scene that is already running.
    #[error("scene is already initialized")]
    AlreadyInitialized,
    /// The scene was disposed and accepts no further work.
    #[error("scene has been disposed")]
    Disposed,
}

/// Lifecycle of the scene's GPU-facing resources.
///
/// The scene starts `NotReady` and produces no frames until the host has
/// finished resolving external resources (device, surface, textures) and
/// calls `initialize`. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    NotReady,
    Ready,
    Disposed,
}

/// Fixed camera pose for the drive-into-the-horizon framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: glam::Vec3,
    pub target: glam::Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            // Just above the deck, close to the terrain's near edge.
            position: glam::Vec3::new(0.0, 0.06, 1.1),
            target: glam::Vec3::ZERO,
            fov_y_degrees: 75.0,
            near: 0.01,
            far: 20.0,
        }
    }
}

/// Linear depth fog between `near` and `far`, in view distance units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: BACKGROUND,
            near: 1.0,
            far: 2.5,
        }
    }
}

/// Per-frame snapshot handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Both terrain tiles with their current offsets, A first.
    pub tiles: [Tile; 2],
}

/// The authoritative scene.
///
/// Owns the frame clock, the terrain scroller, the light rig, and the
/// camera/fog constants. All mutation flows through explicit operations:
/// `initialize`, `advance`, `set_viewport`, `dispose`. Renderers derive
/// everything they draw from the state held here and never write back.
#[derive(Debug, Clone)]
pub struct Scene {
    clock: FrameClock,
    scroll: TerrainScroll,
    rig: LightRig,
    camera: CameraPose,
    fog: Fog,
    terrain: TerrainParams,
    viewport: Viewport,
    mount: Mount,
}

impl Scene {
    /// A scene in the `NotReady` state with the default procedural grid.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_style(viewport, GridStyle::Procedural)
    }

    /// A scene using the given grid rendering style.
    pub fn with_style(viewport: Viewport, style: GridStyle) -> Self {
        Self {
            clock: FrameClock::new(),
            scroll: TerrainScroll::new(),
            rig: LightRig::new(),
            camera: CameraPose::default(),
            fog: Fog::default(),
            terrain: TerrainParams::for_style(style),
            viewport,
            mount: Mount::NotReady,
        }
    }

    /// Mark external resources resolved and begin accepting frames.
    pub fn initialize(&mut self) -> Result<(), SceneError> {
        match self.mount {
            Mount::NotReady => {
                self.mount = Mount::Ready;
                tracing::info!(
                    width = self.viewport.width,
                    height = self.viewport.height,
                    "scene initialized"
                );
                Ok(())
            }
            Mount::Ready => Err(SceneError::AlreadyInitialized),
            Mount::Disposed => Err(SceneError::Disposed),
        }
    }

    /// Advance the clock by `dt` seconds and return the frame snapshot.
    ///
    /// Fails unless the scene is `Ready`. `dt` must be non-negative; the
    /// clock panics on time running backwards rather than absorbing it.
    pub fn advance(&mut self, dt: f64) -> Result<FrameState, SceneError> {
        match self.mount {
            Mount::Ready => {}
            Mount::NotReady => return Err(SceneError::NotReady),
            Mount::Disposed => return Err(SceneError::Disposed),
        }
        let elapsed = self.clock.advance(dt);
        self.scroll.update(elapsed);
        Ok(FrameState {
            elapsed,
            tiles: self.scroll.tiles(),
        })
    }

    /// Record a new viewport. Later calls win; the renderer picks up the
    /// current value on its next frame. Allowed before `initialize` so a
    /// host can track window resizes while resources are still loading.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SceneError> {
        if self.mount == Mount::Disposed {
            return Err(SceneError::Disposed);
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            density = viewport.pixel_density,
            "viewport updated"
        );
        self.viewport = viewport;
        Ok(())
    }

    /// Release the scene. Idempotent; every operation after this fails
    /// with `SceneError::Disposed`.
    pub fn dispose(&mut self) {
        if self.mount != Mount::Disposed {
            self.mount = Mount::Disposed;
            tracing::info!(elapsed = self.clock.elapsed(), "scene disposed");
        }
    }

    pub fn mount(&self) -> Mount {
        self.mount
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn fog(&self) -> &Fog {
        &self.fog
    }

    pub fn lights(&self) -> &LightRig {
        &self.rig
    }

    pub fn terrain(&self) -> &TerrainParams {
        &self.terrain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TILE_LENGTH;

    #[test]
    fn new_scene_is_not_ready() {
        let scene = Scene::new(Viewport::default());
        assert_eq!(scene.mount(), Mount::NotReady);
        assert_eq!(scene.elapsed(), 0.0);
    }

    #[test]
    fn advance_requires_initialization() {
        let mut scene = Scene::new(Viewport::default());
        assert_eq!(scene.advance(0.016), Err(SceneError::NotReady));
        scene.initialize().unwrap();
        assert!(scene.advance(0.016).is_ok());
    }

    #[test]
    fn double_initialize_is_an_error() {
        let mut scene = Scene::new(Viewport::default());
        scene.initialize().unwrap();
        assert_eq!(scene.initialize(), Err(SceneError::AlreadyInitialized));
    }

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let mut scene = Scene::new(Viewport::default());
        scene.initialize().unwrap();
        scene.dispose();
        scene.dispose();
        assert_eq!(scene.mount(), Mount::Disposed);
        assert_eq!(scene.advance(0.016), Err(SceneError::Disposed));
        assert_eq!(scene.initialize(), Err(SceneError::Disposed));
        assert_eq!(
            scene.set_viewport(Viewport::default()),
            Err(SceneError::Disposed)
        );
    }

    #[test]
    fn dispose_before_ready_is_allowed() {
        let mut scene = Scene::new(Viewport::default());
        scene.dispose();
        assert_eq!(scene.mount(), Mount::Disposed);
        assert_eq!(scene.initialize(), Err(SceneError::Disposed));
    }

    #[test]
    fn viewport_updates_before_ready_and_last_wins() {
        let mut scene = Scene::new(Viewport::default());
        scene.set_viewport(Viewport::new(640, 480, 1.0)).unwrap();
        scene.set_viewport(Viewport::new(1920, 1080, 2.0)).unwrap();
        assert_eq!(scene.viewport().width, 1920);
        assert_eq!(scene.viewport().pixel_density, 2.0);
    }

    #[test]
    fn frame_state_carries_scroll_offsets() {
        let mut scene = Scene::new(Viewport::default());
        scene.initialize().unwrap();
        let state = scene.advance(20.0 / 3.0).unwrap();
        let [a, b] = state.tiles;
        assert!((a.z_offset - 1.0).abs() < 1e-9);
        assert!((b.z_offset + 1.0).abs() < 1e-9);
        assert!((state.elapsed - 20.0 / 3.0).abs() < 1e-12);
    }

    /// A full session: come up, run at 60 Hz past a tile wrap with a
    /// window resize in the middle, then tear down.
    #[test]
    fn session_with_resize_and_wrap() {
        let mut scene = Scene::new(Viewport::new(1280, 720, 1.0));
        scene.initialize().unwrap();

        // 790 frames at 60 Hz: 13.17 s, phase 1.975, just before the wrap.
        let mut state = scene.advance(0.0).unwrap();
        for _ in 0..790 {
            state = scene.advance(1.0 / 60.0).unwrap();
        }
        assert!((state.tiles[0].z_offset - 1.975).abs() < 1e-6);

        scene.set_viewport(Viewport::new(2560, 1440, 2.0)).unwrap();

        // 20 more frames crosses 40/3 s; tile A wraps back near zero.
        for _ in 0..20 {
            state = scene.advance(1.0 / 60.0).unwrap();
        }
        assert!((state.tiles[0].z_offset - 0.025).abs() < 1e-6);
        assert_eq!(
            state.tiles[1].z_offset,
            state.tiles[0].z_offset - TILE_LENGTH
        );
        assert_eq!(scene.viewport().width, 2560);

        scene.dispose();
        assert_eq!(scene.advance(1.0 / 60.0), Err(SceneError::Disposed));
    }

    #[test]
    fn style_selects_material_constants() {
        let scene = Scene::with_style(Viewport::default(), GridStyle::Texture);
        assert_eq!(scene.terrain().metalness, 0.95);
        assert_eq!(Scene::new(Viewport::default()).terrain().metalness, 0.9);
    }
}
