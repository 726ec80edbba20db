//! Visible point-sprite pass.
//!
//! One instanced quad per particle. The instance buffer carries only the
//! lattice coordinate; positions come from the simulation textures.

use wgpu::util::DeviceExt;

use super::simulation::{position_texture_entry, uniform_entry, SimulationPass};
use crate::grid::{LatticeVertex, ParticleGrid};
use crate::shaders::points_shader;
use crate::uniforms::PointUniforms;

/// Vertices per sprite quad.
const QUAD_VERTICES: u32 = 6;

/// GPU resources for the render stage.
pub struct PointsPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    lattice_buffer: wgpu::Buffer,
    /// `bind_groups[i]` samples position texture `i`.
    bind_groups: [wgpu::BindGroup; 2],
    instance_count: u32,
}

impl PointsPass {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        grid: &ParticleGrid,
        simulation: &SimulationPass,
    ) -> Self {
        let lattice = grid.lattice();
        let lattice_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lattice Buffer"),
            contents: bytemuck::cast_slice(&lattice),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Uniforms"),
            contents: bytemuck::bytes_of(&PointUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let stages = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Points Bind Group Layout"),
            entries: &[
                uniform_entry(0, stages),
                position_texture_entry(1, wgpu::ShaderStages::VERTEX),
                position_texture_entry(2, wgpu::ShaderStages::VERTEX),
            ],
        });

        let make_bind_group = |positions: &wgpu::TextureView, label: &str| {
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
                        resource: wgpu::BindingResource::TextureView(positions),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(simulation.initial_view()),
                    },
                ],
            })
        };
        let views = simulation.views();
        let bind_groups = [
            make_bind_group(&views[0], "Points Bind Group (A)"),
            make_bind_group(&views[1], "Points Bind Group (B)"),
        ];

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Points Shader"),
            source: wgpu::ShaderSource::Wgsl(points_shader().into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Points Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LatticeVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2, // lattice uv
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Sprites are blended in submission order without depth writes.
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_buffer,
            lattice_buffer,
            bind_groups,
            instance_count: grid.particle_count(),
        }
    }

    /// Stage new uniforms for the next submission.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &PointUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draw every particle, reading position texture `current`.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, current: usize) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[current], &[]);
        pass.set_vertex_buffer(0, self.lattice_buffer.slice(..));
        pass.draw(0..QUAD_VERTICES, 0..self.instance_count);
    }
}
