use crate::camera::OrbitCamera;
use crate::post::{PostStack, CHAIN_FORMAT, MSAA_SAMPLES};
use crate::terrain::TerrainPipeline;
use neondrift_assets::SceneTextures;
use neondrift_common::Viewport;
use neondrift_render::PassChain;
use neondrift_scene::{FrameState, Scene, BACKGROUND};

/// GPU renderer for one scene: the terrain pass plus the post chain.
///
/// The renderer never advances the scene. Callers drive the scene clock,
/// then hand the resulting frame state here to be drawn.
pub struct SceneRenderer {
    terrain: TerrainPipeline,
    post: PostStack,
    chain: PassChain,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scene: &Scene,
        textures: &SceneTextures,
    ) -> Self {
        let chain = PassChain::new(viewport);
        let terrain =
            TerrainPipeline::new(device, queue, scene, textures, CHAIN_FORMAT, MSAA_SAMPLES);
        let post = PostStack::new(device, surface_format, chain.extent(), chain.bloom_extent());
        tracing::info!(extent = ?chain.extent(), "scene renderer ready");
        Self {
            terrain,
            post,
            chain,
        }
    }

    /// Resize the pass chain and rebuild every offscreen target.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        self.chain.resize(viewport);
        self.post
            .resize(device, self.chain.extent(), self.chain.bloom_extent());
    }

    pub fn chain(&self) -> &PassChain {
        &self.chain
    }

    /// Draw one frame onto `surface_view` and submit it.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_view: &wgpu::TextureView,
        camera: &OrbitCamera,
        scene: &Scene,
        frame: &FrameState,
    ) {
        let params = self.chain.frame_params();
        self.terrain.write_frame(queue, camera, scene, frame);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });
        {
            // Multisampled draw, resolved into the first chain target. The
            // samples themselves are not needed once resolved.
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("base_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post.msaa_view(),
                    resolve_target: Some(self.post.scene_view()),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: BACKGROUND.r as f64,
                            g: BACKGROUND.g as f64,
                            b: BACKGROUND.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.post.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            self.terrain.draw(&mut pass);
        }
        self.post.run(&mut encoder, queue, &params, surface_view);

        queue.submit(std::iter::once(encoder.finish()));
    }
}
