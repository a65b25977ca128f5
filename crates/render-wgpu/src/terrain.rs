use crate::camera::OrbitCamera;
use crate::mesh::{plane_mesh, TerrainVertex};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use neondrift_assets::{FieldImage, SceneTextures};
use neondrift_scene::{FrameState, GridStyle, Scene, Spotlight};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuSpotlight {
    position: [f32; 4],
    direction: [f32; 4],
    color: [f32; 4],
    cone: [f32; 4],
}

impl GpuSpotlight {
    fn from_light(light: &Spotlight) -> Self {
        let axis = (light.target - light.position).normalize();
        let cos_outer = light.cone_angle.cos();
        let cos_inner = (light.cone_angle * (1.0 - light.penumbra)).cos();
        Self {
            position: [
                light.position.x,
                light.position.y,
                light.position.z,
                light.falloff_distance,
            ],
            direction: [axis.x, axis.y, axis.z, light.decay],
            color: [light.color.r, light.color.g, light.color.b, light.intensity],
            cone: [cos_outer, cos_inner, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    camera: [f32; 4],
    fog: [f32; 4],
    params: [f32; 4],
    material: [f32; 4],
    lights: [GpuSpotlight; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TileInstance {
    offset: [f32; 3],
}

/// Pipeline and resources for the two displaced terrain tiles.
///
/// Both tiles share one mesh and one set of textures; a two-entry instance
/// buffer carries the per-tile Z offsets, so the whole landscape is a
/// single instanced draw.
pub struct TerrainPipeline {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    tile_buffer: wgpu::Buffer,
}

impl TerrainPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &Scene,
        textures: &SceneTextures,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain_globals_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain_globals_bind_group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let texture_entry = |binding: u32, visibility: wgpu::ShaderStages| {
            wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                // Displacement is read by the vertex stage.
                texture_entry(1, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(2, wgpu::ShaderStages::FRAGMENT),
                texture_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("terrain_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let displacement = upload_texture(device, queue, &textures.displacement, "displacement_map");
        let metalness = upload_texture(device, queue, &textures.metalness, "metalness_map");
        let grid = upload_texture(device, queue, &textures.grid, "grid_map");

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("terrain_texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&displacement),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&metalness),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&grid),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain_pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("terrain_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::TERRAIN_SHADER.into()),
        });

        let fragment_entry = match scene.terrain().style {
            GridStyle::Procedural => "fs_procedural",
            GridStyle::Texture => "fs_texture",
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("terrain_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_terrain"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<TerrainVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<TileInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x3,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let (vertices, indices) = plane_mesh(scene.terrain());
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("terrain_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let tile_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("terrain_tiles"),
            size: (2 * std::mem::size_of::<TileInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!(
            vertices = vertices.len(),
            indices = indices.len(),
            ?fragment_entry,
            "terrain pipeline built"
        );

        Self {
            pipeline,
            globals_buffer,
            globals_bind_group,
            texture_bind_group,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            tile_buffer,
        }
    }

    /// Upload the per-frame uniforms and tile offsets.
    pub fn write_frame(
        &self,
        queue: &wgpu::Queue,
        camera: &OrbitCamera,
        scene: &Scene,
        frame: &FrameState,
    ) {
        let eye = camera.position();
        let fog = scene.fog();
        let terrain = scene.terrain();
        let rig = scene.lights();

        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera: [eye.x, eye.y, eye.z, frame.elapsed as f32],
            fog: [fog.color.r, fog.color.g, fog.color.b, fog.near],
            params: [
                fog.far,
                terrain.grid_frequency,
                terrain.displacement_scale,
                terrain.metalness,
            ],
            material: [terrain.roughness, 0.0, 0.0, 0.0],
            lights: [
                GpuSpotlight::from_light(&rig.lights()[0]),
                GpuSpotlight::from_light(&rig.lights()[1]),
            ],
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let tiles = frame.tiles.map(|tile| TileInstance {
            offset: [0.0, 0.0, tile.z_offset as f32],
        });
        queue.write_buffer(&self.tile_buffer, 0, bytemuck::cast_slice(&tiles));
    }

    /// Record the instanced draw of both tiles into an open render pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.tile_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..2);
    }
}

/// Upload a decoded bitmap as a linear RGBA8 texture. The whole pipeline
/// runs linear until the gamma pass, so no sRGB view formats here.
fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &FieldImage,
    label: &str,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.rgba(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    texture.create_view(&Default::default())
}
