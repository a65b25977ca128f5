use crate::shaders;
use bytemuck::{Pod, Zeroable};
use neondrift_render::FrameParams;

/// Format of every intermediate chain target. The chain is LDR end to end;
/// highlights saturate into the bloom rather than carrying HDR buffers.
pub(crate) const CHAIN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// MSAA sample count of the base scene pass.
pub(crate) const MSAA_SAMPLES: u32 = 4;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ShiftUniforms {
    amount: f32,
    angle: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BrightUniforms {
    threshold: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct BlurUniforms {
    direction: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CompositeUniforms {
    strength: f32,
    _pad: [f32; 3],
}

/// Offscreen color and depth attachments, recreated on every resize.
struct FrameTargets {
    /// 4x multisampled scene color, resolved into `scene`.
    msaa: wgpu::TextureView,
    depth: wgpu::TextureView,
    scene: wgpu::TextureView,
    shifted: wgpu::TextureView,
    corrected: wgpu::TextureView,
    /// Half-resolution glow chain.
    bright: wgpu::TextureView,
    blur_ping: wgpu::TextureView,
    blur_pong: wgpu::TextureView,
}

struct PassBindGroups {
    shift: wgpu::BindGroup,
    gamma: wgpu::BindGroup,
    bright: wgpu::BindGroup,
    blur_h: wgpu::BindGroup,
    blur_v: wgpu::BindGroup,
    composite: wgpu::BindGroup,
}

/// GPU half of the post-processing chain: chromatic shift, gamma, bloom.
///
/// The base pass renders into `msaa_view` and resolves to `scene_view`;
/// `run` then walks the remaining stages and lands the composite on the
/// swapchain. Target sizes always mirror the pass-chain model, full
/// resolution for the color stages and half resolution for the blur.
pub struct PostStack {
    sampler: wgpu::Sampler,
    single_layout: wgpu::BindGroupLayout,
    gamma_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,

    shift_pipeline: wgpu::RenderPipeline,
    gamma_pipeline: wgpu::RenderPipeline,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,

    shift_buffer: wgpu::Buffer,
    bright_buffer: wgpu::Buffer,
    blur_h_buffer: wgpu::Buffer,
    blur_v_buffer: wgpu::Buffer,
    composite_buffer: wgpu::Buffer,

    targets: FrameTargets,
    bind_groups: PassBindGroups,
    extent: [u32; 2],
    bloom_extent: [u32; 2],
}

impl PostStack {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        extent: [u32; 2],
        bloom_extent: [u32; 2],
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let single_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_single_layout"),
            entries: &[
                sampler_entry(0),
                texture_entry(1),
                uniform_entry(2),
            ],
        });
        let gamma_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_gamma_layout"),
            entries: &[sampler_entry(0), texture_entry(1)],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_composite_layout"),
            entries: &[
                sampler_entry(0),
                texture_entry(1),
                texture_entry(2),
                uniform_entry(3),
            ],
        });

        let shift_pipeline = fullscreen_pipeline(
            device,
            &single_layout,
            shaders::SHIFT_SHADER,
            "fs_shift",
            CHAIN_FORMAT,
            "shift_pipeline",
        );
        let gamma_pipeline = fullscreen_pipeline(
            device,
            &gamma_layout,
            shaders::GAMMA_SHADER,
            "fs_gamma",
            CHAIN_FORMAT,
            "gamma_pipeline",
        );
        let bright_pipeline = fullscreen_pipeline(
            device,
            &single_layout,
            shaders::BLOOM_BRIGHT_SHADER,
            "fs_bright",
            CHAIN_FORMAT,
            "bloom_bright_pipeline",
        );
        let blur_pipeline = fullscreen_pipeline(
            device,
            &single_layout,
            shaders::BLOOM_BLUR_SHADER,
            "fs_blur",
            CHAIN_FORMAT,
            "bloom_blur_pipeline",
        );
        let composite_pipeline = fullscreen_pipeline(
            device,
            &composite_layout,
            shaders::BLOOM_COMPOSITE_SHADER,
            "fs_composite",
            surface_format,
            "bloom_composite_pipeline",
        );

        let uniform_buffer = |label: &str| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: 16,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let shift_buffer = uniform_buffer("shift_uniforms");
        let bright_buffer = uniform_buffer("bright_uniforms");
        let blur_h_buffer = uniform_buffer("blur_h_uniforms");
        let blur_v_buffer = uniform_buffer("blur_v_uniforms");
        let composite_buffer = uniform_buffer("composite_uniforms");

        let targets = make_targets(device, extent, bloom_extent);
        let bind_groups = make_bind_groups(
            device,
            &single_layout,
            &gamma_layout,
            &composite_layout,
            &sampler,
            [
                &shift_buffer,
                &bright_buffer,
                &blur_h_buffer,
                &blur_v_buffer,
                &composite_buffer,
            ],
            &targets,
        );

        Self {
            sampler,
            single_layout,
            gamma_layout,
            composite_layout,
            shift_pipeline,
            gamma_pipeline,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            shift_buffer,
            bright_buffer,
            blur_h_buffer,
            blur_v_buffer,
            composite_buffer,
            targets,
            bind_groups,
            extent,
            bloom_extent,
        }
    }

    /// Recreate every intermediate target for the new sizes. Bind groups
    /// follow, since they reference the old views.
    pub fn resize(&mut self, device: &wgpu::Device, extent: [u32; 2], bloom_extent: [u32; 2]) {
        if self.extent == extent && self.bloom_extent == bloom_extent {
            return;
        }
        self.extent = extent;
        self.bloom_extent = bloom_extent;
        self.targets = make_targets(device, extent, bloom_extent);
        self.bind_groups = make_bind_groups(
            device,
            &self.single_layout,
            &self.gamma_layout,
            &self.composite_layout,
            &self.sampler,
            [
                &self.shift_buffer,
                &self.bright_buffer,
                &self.blur_h_buffer,
                &self.blur_v_buffer,
                &self.composite_buffer,
            ],
            &self.targets,
        );
        tracing::debug!(?extent, ?bloom_extent, "post targets rebuilt");
    }

    /// Multisampled color attachment for the base pass.
    pub fn msaa_view(&self) -> &wgpu::TextureView {
        &self.targets.msaa
    }

    /// Resolve target the base pass lands in.
    pub fn scene_view(&self) -> &wgpu::TextureView {
        &self.targets.scene
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.targets.depth
    }

    /// Run shift, gamma, and bloom, compositing onto `surface_view`.
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        params: &FrameParams,
        surface_view: &wgpu::TextureView,
    ) {
        queue.write_buffer(
            &self.shift_buffer,
            0,
            bytemuck::bytes_of(&ShiftUniforms {
                amount: params.shift_amount,
                angle: params.shift_angle,
                _pad: [0.0; 2],
            }),
        );
        queue.write_buffer(
            &self.bright_buffer,
            0,
            bytemuck::bytes_of(&BrightUniforms {
                threshold: params.bloom_threshold,
                _pad: [0.0; 3],
            }),
        );
        // The radius spreads the kernel in texels of the half-res targets.
        queue.write_buffer(
            &self.blur_h_buffer,
            0,
            bytemuck::bytes_of(&BlurUniforms {
                direction: [params.bloom_radius / self.bloom_extent[0] as f32, 0.0],
                _pad: [0.0; 2],
            }),
        );
        queue.write_buffer(
            &self.blur_v_buffer,
            0,
            bytemuck::bytes_of(&BlurUniforms {
                direction: [0.0, params.bloom_radius / self.bloom_extent[1] as f32],
                _pad: [0.0; 2],
            }),
        );
        queue.write_buffer(
            &self.composite_buffer,
            0,
            bytemuck::bytes_of(&CompositeUniforms {
                strength: params.bloom_strength,
                _pad: [0.0; 3],
            }),
        );

        blit(
            encoder,
            "shift_pass",
            &self.shift_pipeline,
            &self.bind_groups.shift,
            &self.targets.shifted,
        );
        blit(
            encoder,
            "gamma_pass",
            &self.gamma_pipeline,
            &self.bind_groups.gamma,
            &self.targets.corrected,
        );
        blit(
            encoder,
            "bloom_bright_pass",
            &self.bright_pipeline,
            &self.bind_groups.bright,
            &self.targets.bright,
        );
        blit(
            encoder,
            "bloom_blur_h_pass",
            &self.blur_pipeline,
            &self.bind_groups.blur_h,
            &self.targets.blur_ping,
        );
        blit(
            encoder,
            "bloom_blur_v_pass",
            &self.blur_pipeline,
            &self.bind_groups.blur_v,
            &self.targets.blur_pong,
        );
        blit(
            encoder,
            "bloom_composite_pass",
            &self.composite_pipeline,
            &self.bind_groups.composite,
            surface_view,
        );
    }
}

/// One fullscreen-triangle pass into `target`.
fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    target: &wgpu::TextureView,
) {
    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        ..Default::default()
    });
    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.draw(0..3, 0..1);
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    shader_source: &str,
    fragment_entry: &str,
    target_format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some("vs_fullscreen"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn make_targets(device: &wgpu::Device, extent: [u32; 2], bloom_extent: [u32; 2]) -> FrameTargets {
    let color = |label: &str, size: [u32; 2], samples: u32, usage: wgpu::TextureUsages| {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size[0].max(1),
                height: size[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format: CHAIN_FORMAT,
            usage,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    };
    let attach_and_sample =
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;

    let depth = device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("post_depth"),
            size: wgpu::Extent3d {
                width: extent[0].max(1),
                height: extent[1].max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: MSAA_SAMPLES,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&Default::default());

    FrameTargets {
        msaa: color(
            "post_msaa",
            extent,
            MSAA_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        ),
        depth,
        scene: color("post_scene", extent, 1, attach_and_sample),
        shifted: color("post_shifted", extent, 1, attach_and_sample),
        corrected: color("post_corrected", extent, 1, attach_and_sample),
        bright: color("post_bright", bloom_extent, 1, attach_and_sample),
        blur_ping: color("post_blur_ping", bloom_extent, 1, attach_and_sample),
        blur_pong: color("post_blur_pong", bloom_extent, 1, attach_and_sample),
    }
}

fn make_bind_groups(
    device: &wgpu::Device,
    single_layout: &wgpu::BindGroupLayout,
    gamma_layout: &wgpu::BindGroupLayout,
    composite_layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    buffers: [&wgpu::Buffer; 5],
    targets: &FrameTargets,
) -> PassBindGroups {
    let [shift_buffer, bright_buffer, blur_h_buffer, blur_v_buffer, composite_buffer] = buffers;
    let single = |label: &str, input: &wgpu::TextureView, buffer: &wgpu::Buffer| {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: single_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(input),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
        })
    };

    let gamma = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("gamma_bind_group"),
        layout: gamma_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&targets.shifted),
            },
        ],
    });

    let composite = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("composite_bind_group"),
        layout: composite_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&targets.corrected),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&targets.blur_pong),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: composite_buffer.as_entire_binding(),
            },
        ],
    });

    PassBindGroups {
        shift: single("shift_bind_group", &targets.scene, shift_buffer),
        gamma,
        bright: single("bright_bind_group", &targets.corrected, bright_buffer),
        blur_h: single("blur_h_bind_group", &targets.bright, blur_h_buffer),
        blur_v: single("blur_v_bind_group", &targets.blur_ping, blur_v_buffer),
        composite,
    }
}
