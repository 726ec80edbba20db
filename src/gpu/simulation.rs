//! Offscreen simulation pass.
//!
//! Particle positions live in `Rgba32Float` textures, one texel per
//! particle. Two textures ping-pong: each pass reads the previous frame's
//! positions plus the immutable initial positions and writes the other
//! texture through a fullscreen triangle. Both are seeded with the initial
//! positions, so the render stage never samples an unwritten texture.

use wgpu::util::DeviceExt;

use crate::grid::ParticleGrid;
use crate::shaders::simulation_shader;
use crate::uniforms::SimulationUniforms;

/// Texel format of every position texture.
pub const POSITION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Layout entry for a non-filterable float texture read with `textureLoad`.
pub(crate) fn position_texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: false },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(crate) fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_position_texture(
    device: &wgpu::Device,
    label: &str,
    size: u32,
    usage: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: POSITION_FORMAT,
        usage,
        view_formats: &[],
    })
}

fn upload_positions(queue: &wgpu::Queue, texture: &wgpu::Texture, size: u32, data: &[u8]) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(size * 16),
            rows_per_image: Some(size),
        },
        wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
    );
}

/// GPU resources for the simulation stage.
pub struct SimulationPass {
    /// Ping-pong position textures. Kept alive for their views.
    #[allow(dead_code)]
    textures: [wgpu::Texture; 2],
    views: [wgpu::TextureView; 2],
    #[allow(dead_code)]
    initial_texture: wgpu::Texture,
    initial_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
    /// `bind_groups[i]` reads `views[i]`.
    bind_groups: [wgpu::BindGroup; 2],
    /// Index of the texture holding the latest positions.
    current: usize,
}

impl SimulationPass {
    /// Allocate the position textures for `grid` and build the pipeline.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, grid: &ParticleGrid) -> Self {
        let size = grid.size();
        let seed = grid.initial_positions();
        let seed_bytes: &[u8] = bytemuck::cast_slice(&seed);

        let ping_pong_usage = wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST;
        let textures = [
            create_position_texture(device, "Positions A", size, ping_pong_usage),
            create_position_texture(device, "Positions B", size, ping_pong_usage),
        ];
        let initial_texture = create_position_texture(
            device,
            "Initial Positions",
            size,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        for texture in textures.iter().chain(std::iter::once(&initial_texture)) {
            upload_positions(queue, texture, size, seed_bytes);
        }

        let views = [
            textures[0].create_view(&wgpu::TextureViewDescriptor::default()),
            textures[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];
        let initial_view = initial_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Uniforms"),
            contents: bytemuck::bytes_of(&SimulationUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Simulation Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                position_texture_entry(1, wgpu::ShaderStages::FRAGMENT),
                position_texture_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let make_bind_group = |previous: &wgpu::TextureView, label: &str| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(previous),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&initial_view),
                    },
                ],
            })
        };
        let bind_groups = [
            make_bind_group(&views[0], "Simulation Bind Group (read A)"),
            make_bind_group(&views[1], "Simulation Bind Group (read B)"),
        ];

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Simulation Shader"),
            source: wgpu::ShaderSource::Wgsl(simulation_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Simulation Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Simulation Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: POSITION_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        log::debug!("simulation targets: 3 × {size}×{size} {POSITION_FORMAT:?}");

        Self {
            textures,
            views,
            initial_texture,
            initial_view,
            uniform_buffer,
            pipeline,
            bind_groups,
            current: 0,
        }
    }

    /// Index of the texture holding the latest positions.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Position texture views, indexable by [`SimulationPass::current`].
    pub fn views(&self) -> &[wgpu::TextureView; 2] {
        &self.views
    }

    pub fn initial_view(&self) -> &wgpu::TextureView {
        &self.initial_view
    }

    /// Stage new uniforms. They take effect on the next submission.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &SimulationUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record one simulation step and swap the ping-pong targets.
    pub fn encode(&mut self, encoder: &mut wgpu::CommandEncoder) {
        let target = 1 - self.current;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Simulation Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.views[target],
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_groups[self.current], &[]);
            pass.draw(0..3, 0..1);
        }
        self.current = target;
    }
}
