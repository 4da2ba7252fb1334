//! egui_wgpu integration for the globe scene
//!
//! Renders the globe and point markers offscreen with a depth buffer, then
//! blits the result into egui's render pass.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use wgpu::util::DeviceExt;

use super::earth::{generate_globe_sphere, GlobeVertex};
use super::markers::PointInstance;
use super::textures::TextureData;
use super::{Camera, CameraUniform};

const MARKER_CAPACITY: u32 = 1024;
const BUMP_SCALE: f32 = 4.0;

/// Per-frame data passed to the callback
#[derive(Clone)]
pub struct SceneRenderData {
    pub camera: Camera,
    pub aspect_ratio: f32,
    pub points: Arc<Vec<PointInstance>>,
}

impl Default for SceneRenderData {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            aspect_ratio: 16.0 / 9.0,
            points: Arc::new(Vec::new()),
        }
    }
}

/// Decoded textures for the globe surface
pub struct GlobeTextures {
    pub color: TextureData,
    /// Height map; only the red channel is read
    pub bump: TextureData,
}

/// GPU resources for the globe scene, stored in callback_resources
pub struct GlobeRenderResources {
    // Offscreen render target
    offscreen_view: wgpu::TextureView,
    offscreen_size: (u32, u32),
    depth_view: wgpu::TextureView,
    target_format: wgpu::TextureFormat,
    clear_color: wgpu::Color,

    // Camera
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // Globe
    globe_vertex_buffer: wgpu::Buffer,
    globe_index_buffer: wgpu::Buffer,
    globe_index_count: u32,
    globe_pipeline: wgpu::RenderPipeline,
    globe_bind_group: wgpu::BindGroup,
    globe_uniform_buffer: wgpu::Buffer,

    // Point markers (instanced)
    marker_pipeline: wgpu::RenderPipeline,
    marker_buffer: wgpu::Buffer,

    // Blit pipeline (for drawing offscreen texture to egui)
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_bind_group: wgpu::BindGroup,
    blit_sampler: wgpu::Sampler,

    // Shared render data (updated each frame)
    render_data: RwLock<SceneRenderData>,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobeUniforms {
    light_direction: [f32; 4],
    bump_scale: f32,
    _padding: [f32; 3],
}

fn texture_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
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

fn sampler_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl GlobeRenderResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        textures: &GlobeTextures,
        clear_color: wgpu::Color,
    ) -> Result<Self> {
        log::info!("Initializing GlobeRenderResources ({}x{})", width, height);
        if width == 0 || height == 0 {
            anyhow::bail!("Invalid offscreen size {}x{}", width, height);
        }

        let offscreen_view = Self::create_offscreen_texture(device, width, height, target_format);
        let depth_view = Self::create_depth_texture(device, width, height);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[uniform_layout_entry(0)],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Globe mesh and textures
        let (globe_vertices, globe_indices) = generate_globe_sphere(96, 48);

        let globe_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Vertex Buffer"),
            contents: bytemuck::cast_slice(&globe_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let globe_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globe Index Buffer"),
            contents: bytemuck::cast_slice(&globe_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let globe_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globe Uniform Buffer"),
            size: std::mem::size_of::<GlobeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_texture = textures.color.create_texture(device, queue, "Globe Texture");
        let bump_texture = textures.bump.create_texture(device, queue, "Bump Texture");
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bump_view = bump_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = super::textures::create_sampler(device, "Globe Sampler");

        let globe_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Globe Bind Group Layout"),
                entries: &[
                    uniform_layout_entry(0),
                    texture_layout_entry(1),
                    texture_layout_entry(2),
                    sampler_layout_entry(3),
                ],
            });

        let globe_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globe Bind Group"),
            layout: &globe_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globe_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&bump_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let globe_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(GLOBE_SHADER.into()),
        });

        let globe_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Globe Pipeline Layout"),
                bind_group_layouts: &[&camera_bind_group_layout, &globe_bind_group_layout],
                push_constant_ranges: &[],
            });

        let globe_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Globe Pipeline"),
            layout: Some(&globe_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &globe_shader,
                entry_point: Some("vs_main"),
                buffers: &[GlobeVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &globe_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Marker pipeline (instanced camera-facing columns)
        let marker_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Marker Instance Buffer"),
            size: (MARKER_CAPACITY as usize * std::mem::size_of::<PointInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let marker_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Marker Shader"),
            source: wgpu::ShaderSource::Wgsl(MARKER_SHADER.into()),
        });

        let marker_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Marker Pipeline Layout"),
                bind_group_layouts: &[&camera_bind_group_layout],
                push_constant_ranges: &[],
            });

        let marker_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Marker Pipeline"),
            layout: Some(&marker_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &marker_shader,
                entry_point: Some("vs_main"),
                buffers: &[PointInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &marker_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Blit pipeline (to draw offscreen texture to egui's render pass)
        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER.into()),
        });

        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Blit Bind Group Layout"),
                entries: &[texture_layout_entry(0), sampler_layout_entry(1)],
            });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let blit_bind_group = Self::create_blit_bind_group(
            device,
            &blit_bind_group_layout,
            &offscreen_view,
            &blit_sampler,
        );

        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            push_constant_ranges: &[],
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
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

        Ok(Self {
            offscreen_view,
            offscreen_size: (width, height),
            depth_view,
            target_format,
            clear_color,
            camera_buffer,
            camera_bind_group,
            globe_vertex_buffer,
            globe_index_buffer,
            globe_index_count: globe_indices.len() as u32,
            globe_pipeline,
            globe_bind_group,
            globe_uniform_buffer,
            marker_pipeline,
            marker_buffer,
            blit_pipeline,
            blit_bind_group_layout,
            blit_bind_group,
            blit_sampler,
            render_data: RwLock::new(SceneRenderData::default()),
        })
    }

    fn create_offscreen_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_blit_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// Update render data (called from app each frame)
    pub fn set_render_data(&self, data: SceneRenderData) {
        *self.render_data.write() = data;
    }

    /// Resize offscreen buffers if needed
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.offscreen_size == (width, height) || width == 0 || height == 0 {
            return;
        }
        let offscreen_view = Self::create_offscreen_texture(device, width, height, self.target_format);
        self.blit_bind_group = Self::create_blit_bind_group(
            device,
            &self.blit_bind_group_layout,
            &offscreen_view,
            &self.blit_sampler,
        );
        self.offscreen_view = offscreen_view;
        self.depth_view = Self::create_depth_texture(device, width, height);
        self.offscreen_size = (width, height);
    }

    /// Render the globe scene to the offscreen buffer
    pub fn render_offscreen(&self, queue: &wgpu::Queue, encoder: &mut wgpu::CommandEncoder) {
        let data = self.render_data.read();

        let camera_uniform = CameraUniform::from_camera(&data.camera, data.aspect_ratio);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));

        // Light follows the camera so the visible hemisphere is always lit
        let light = data.camera.position().normalize_or_zero();
        let globe_uniforms = GlobeUniforms {
            light_direction: [light.x, light.y, light.z, 0.0],
            bump_scale: BUMP_SCALE,
            _padding: [0.0; 3],
        };
        queue.write_buffer(
            &self.globe_uniform_buffer,
            0,
            bytemuck::bytes_of(&globe_uniforms),
        );

        let marker_count = data.points.len().min(MARKER_CAPACITY as usize);
        if marker_count > 0 {
            queue.write_buffer(
                &self.marker_buffer,
                0,
                bytemuck::cast_slice(&data.points[..marker_count]),
            );
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Globe Offscreen Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.offscreen_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        render_pass.set_pipeline(&self.globe_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.globe_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.globe_vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.globe_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.globe_index_count, 0, 0..1);

        if marker_count > 0 {
            render_pass.set_pipeline(&self.marker_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.marker_buffer.slice(..));
            // 6 vertices (2 triangles for a quad) per column
            render_pass.draw(0..6, 0..marker_count as u32);
        }
    }

    /// Blit the offscreen texture to egui's render pass
    pub fn blit(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        render_pass.set_pipeline(&self.blit_pipeline);
        render_pass.set_bind_group(0, &self.blit_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

/// The callback that egui_wgpu will invoke
pub struct GlobeCallback {
    pub viewport_size: (u32, u32),
}

impl egui_wgpu::CallbackTrait for GlobeCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if let Some(resources) = callback_resources.get_mut::<GlobeRenderResources>() {
            resources.resize(device, self.viewport_size.0, self.viewport_size.1);
            resources.render_offscreen(queue, egui_encoder);
        }
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        if let Some(resources) = callback_resources.get::<GlobeRenderResources>() {
            resources.blit(render_pass);
        }
    }
}

const GLOBE_SHADER: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct GlobeUniforms {
    light_direction: vec4<f32>,
    bump_scale: f32,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;
@group(1) @binding(0) var<uniform> globe: GlobeUniforms;
@group(1) @binding(1) var globe_texture: texture_2d<f32>;
@group(1) @binding(2) var bump_texture: texture_2d<f32>;
@group(1) @binding(3) var tex_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(in.position, 1.0);
    out.normal = in.normal;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);

    // Local east/north frame; east follows increasing u
    var east = cross(vec3<f32>(0.0, 1.0, 0.0), n);
    if (length(east) < 1e-4) {
        east = vec3<f32>(1.0, 0.0, 0.0);
    }
    east = normalize(east);
    let north = cross(n, east);

    let dims = vec2<f32>(textureDimensions(bump_texture));
    let du = vec2<f32>(1.0 / dims.x, 0.0);
    let dv = vec2<f32>(0.0, 1.0 / dims.y);
    let h_east = textureSample(bump_texture, tex_sampler, in.uv + du).r;
    let h_west = textureSample(bump_texture, tex_sampler, in.uv - du).r;
    let h_north = textureSample(bump_texture, tex_sampler, in.uv - dv).r;
    let h_south = textureSample(bump_texture, tex_sampler, in.uv + dv).r;
    let bumped = normalize(
        n - globe.bump_scale * ((h_east - h_west) * east + (h_north - h_south) * north)
    );

    let albedo = textureSample(globe_texture, tex_sampler, in.uv).rgb;
    let diffuse = max(dot(bumped, normalize(globe.light_direction.xyz)), 0.0);
    return vec4<f32>(albedo * (0.45 + 0.75 * diffuse), 1.0);
}
"#;

const MARKER_SHADER: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: CameraUniform;

struct InstanceInput {
    @location(0) base: vec3<f32>,
    @location(1) tip: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) radius: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) across: f32,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    instance: InstanceInput,
) -> VertexOutput {
    // x: across the column, y: base (0) to tip (1)
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0)
    );
    let corner = corners[vertex_index];

    let axis = instance.tip - instance.base;
    let mid = (instance.base + instance.tip) * 0.5;
    let view_dir = normalize(camera.camera_pos.xyz - mid);
    var side = cross(axis, view_dir);
    if (length(side) < 1e-6) {
        side = vec3<f32>(camera.view[0][0], camera.view[1][0], camera.view[2][0]);
    }
    side = normalize(side) * instance.radius;

    let world = instance.base + side * corner.x + axis * corner.y;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(world, 1.0);
    out.color = instance.color;
    out.across = corner.x;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Fake cylinder shading across the quad
    let shade = 0.6 + 0.4 * sqrt(max(1.0 - in.across * in.across, 0.0));
    return vec4<f32>(in.color.rgb * shade, in.color.a);
}
"#;

const BLIT_SHADER: &str = r#"
@group(0) @binding(0) var blit_texture: texture_2d<f32>;
@group(0) @binding(1) var blit_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    // Fullscreen triangle
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0)
    );

    var out: VertexOutput;
    let pos = positions[vertex_index];
    out.clip_position = vec4<f32>(pos, 0.0, 1.0);
    out.uv = pos * 0.5 + 0.5;
    out.uv.y = 1.0 - out.uv.y;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(blit_texture, blit_sampler, in.uv);
}
"#;
