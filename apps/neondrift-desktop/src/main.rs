use anyhow::Result;
use clap::{Parser, ValueEnum};
use neondrift_assets::{spawn_load, AssetError, SceneTextures};
use neondrift_common::Viewport;
use neondrift_render_wgpu::{OrbitCamera, SceneRenderer};
use neondrift_scene::{GridStyle, Scene};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "neondrift-desktop", about = "Windowed host for the drifting landscape")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding grid.png, displacement.png, metalness.png
    #[arg(long, default_value = "./textures")]
    texture_dir: String,

    /// Grid source for the terrain material
    #[arg(long, value_enum, default_value = "procedural")]
    grid: GridArg,

    /// Initial window width in physical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GridArg {
    /// Analytic anti-aliased grid evaluated in the shader
    Procedural,
    /// Sampled from the grid bitmap in the texture directory
    Texture,
}

impl From<GridArg> for GridStyle {
    fn from(arg: GridArg) -> Self {
        match arg {
            GridArg::Procedural => GridStyle::Procedural,
            GridArg::Texture => GridStyle::Texture,
        }
    }
}

/// Windowed application state. GPU members stay `None` until `resumed`;
/// the renderer additionally waits for the texture load to land.
struct DriftApp {
    scene: Scene,
    camera: OrbitCamera,
    pending_textures: Option<Receiver<Result<SceneTextures, AssetError>>>,
    textures: Option<SceneTextures>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    dragging: bool,
    last_frame: Instant,
    initial_size: PhysicalSize<u32>,
}

impl DriftApp {
    fn new(texture_dir: PathBuf, style: GridStyle, initial_size: PhysicalSize<u32>) -> Self {
        let scene = Scene::with_style(Viewport::default(), style);
        let camera = OrbitCamera::from_pose(scene.camera(), scene.viewport().aspect_ratio());
        Self {
            scene,
            camera,
            pending_textures: Some(spawn_load(texture_dir)),
            textures: None,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            dragging: false,
            last_frame: Instant::now(),
            initial_size,
        }
    }

    /// Drain the texture channel and, once both the GPU and the textures
    /// are up, build the renderer and bring the scene to ready.
    ///
    /// A failed load leaves the scene suspended: the renderer is never
    /// built, no frame is ever presented, and there is no retry.
    fn try_finish_setup(&mut self) {
        if let Some(rx) = &self.pending_textures {
            match rx.try_recv() {
                Ok(Ok(textures)) => {
                    self.textures = Some(textures);
                    self.pending_textures = None;
                }
                Ok(Err(e)) => {
                    tracing::error!("texture load failed, staying dark: {e}");
                    self.pending_textures = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("texture loader went away without a result, staying dark");
                    self.pending_textures = None;
                }
            }
        }

        if self.renderer.is_some() {
            return;
        }
        let (Some(textures), Some(device), Some(queue), Some(config)) =
            (&self.textures, &self.device, &self.queue, &self.config)
        else {
            return;
        };

        let renderer = SceneRenderer::new(
            device,
            queue,
            config.format,
            self.scene.viewport(),
            &self.scene,
            textures,
        );
        self.renderer = Some(renderer);
        self.scene.initialize().expect("scene initialize");
        // The bitmaps now live on the GPU; the CPU copies are done.
        self.textures = None;
        self.last_frame = Instant::now();
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        let scale = match &self.window {
            Some(window) => window.scale_factor(),
            None => return,
        };
        let (Some(surface), Some(device), Some(config)) =
            (&self.surface, &self.device, &mut self.config)
        else {
            return;
        };
        config.width = new_size.width.max(1);
        config.height = new_size.height.max(1);
        surface.configure(device, config);

        let viewport = Viewport::from_physical(config.width, config.height, scale);
        let _ = self.scene.set_viewport(viewport);
        self.camera.set_aspect(viewport.aspect_ratio());
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(device, viewport);
        }
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.dispose();
        event_loop.exit();
    }
}

impl ApplicationHandler for DriftApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Neon Drift")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("neondrift_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // The chain applies its own gamma pass, so the swapchain must not
        // encode a second time.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport = Viewport::from_physical(config.width, config.height, window.scale_factor());
        let _ = self.scene.set_viewport(viewport);
        self.camera.set_aspect(viewport.aspect_ratio());

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shut_down(event_loop);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.shut_down(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.handle_resize(size);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 60.0,
                };
                self.camera.zoom(steps);
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = &mut self.renderer else {
                    return;
                };
                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f64().min(0.1);
                self.last_frame = now;

                let frame = match self.scene.advance(dt) {
                    Ok(frame) => frame,
                    Err(e) => {
                        tracing::warn!("dropping frame: {e}");
                        return;
                    }
                };

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                renderer.render(device, queue, &view, &self.camera, &self.scene, &frame);

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.dragging {
                self.camera.rotate(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.try_finish_setup();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("neondrift-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DriftApp::new(
        PathBuf::from(cli.texture_dir),
        cli.grid.into(),
        PhysicalSize::new(cli.width.max(1), cli.height.max(1)),
    );
    event_loop.run_app(&mut app)?;

    Ok(())
}
