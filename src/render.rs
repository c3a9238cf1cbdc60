use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use bytemuck::{bytes_of, Pod, Zeroable};
use glam::{Vec3, Vec4};
use log::{error, warn};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::mesh::{self, MeshData, Vertex};
use crate::obj;
use crate::scene::{BlendMode, FillMode, MeshSource, SceneInstance};

/// Back buffer clear colour.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.125,
    b: 0.3,
    a: 1.0,
};

/// Constant colour the transparent pass blends the destination with.
const BLEND_FACTOR: wgpu::Color = wgpu::Color {
    r: 0.75,
    g: 0.75,
    b: 0.75,
    a: 1.0,
};

/// Edge length of the generated albedo texture.
const CRATE_TEXTURE_SIZE: u32 = 256;

/// Floor grid resolution and placement.
const FLOOR_SIDE: u32 = 5;
const FLOOR_SPACING: f32 = 2.0;
const FLOOR_HEIGHT: f32 = -2.0;

/// Directional light and material constants fed to the shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub direction: Vec3,
    pub diffuse_material: Vec4,
    pub diffuse_light: Vec4,
    pub ambient_material: Vec4,
    pub ambient_light: Vec4,
    pub specular_material: Vec4,
    pub specular_light: Vec4,
    pub specular_power: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.25, 0.5, -1.0),
            diffuse_material: Vec4::new(0.2, 0.2, 0.2, 0.0),
            diffuse_light: Vec4::ONE,
            ambient_material: Vec4::new(0.2, 0.2, 0.2, 0.2),
            ambient_light: Vec4::ONE,
            specular_material: Vec4::new(0.2, 0.2, 1.0, 0.2),
            specular_light: Vec4::ONE,
            specular_power: 1.0,
        }
    }
}

/// GPU renderer backed by wgpu that draws the scene's instance list.
///
/// Pipelines are created on demand per fill and blend combination and
/// cached, so toggling wireframe costs nothing after the first frame.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<(FillMode, BlendMode), wgpu::RenderPipeline>,
    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    texture_bind_group: wgpu::BindGroup,
    mesh_cache: HashMap<MeshSource, MeshBuffers>,
    missing_meshes: HashSet<MeshSource>,
    default_mesh: MeshBuffers,
    wireframe_supported: bool,
    wireframe_warned: bool,
}

impl Renderer {
    /// Initializes the GPU renderer for the provided window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(anyhow!("window has zero area"));
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to acquire GPU adapter")?;

        // Line fill is optional; without it wireframe falls back to solid.
        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("renderer-device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .context("failed to create GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::PresentMode::Mailbox | wgpu::PresentMode::Immediate
                    )
                })
                .unwrap_or(wgpu::PresentMode::Fifo),
            desired_maximum_frame_latency: 2,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("renderer-shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("global-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<GlobalUniform>() as u64)
                            .unwrap(),
                    ),
                },
                count: None,
            }],
        });

        // Per-object uniform layout
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(
                        std::num::NonZeroU64::new(std::mem::size_of::<ObjectConstants>() as u64)
                            .unwrap(),
                    ),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("renderer-pipeline-layout"),
            bind_group_layouts: &[&global_layout, &object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global-uniform"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global-bind-group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group =
            create_albedo_bind_group(&device, &queue, &texture_layout);

        let default_mesh = MeshBuffers::from_mesh(&device, &mesh::cube(), "fallback-cube");

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            shader,
            pipeline_layout,
            pipelines: HashMap::new(),
            global_buffer,
            global_bind_group,
            object_layout,
            texture_bind_group,
            mesh_cache: HashMap::new(),
            missing_meshes: HashSet::new(),
            default_mesh,
            wireframe_supported,
            wireframe_warned: false,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Last size the swap chain was configured for.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Resizes the swap chain to match the new dimensions.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Updates the camera and lighting uniforms before rendering.
    pub fn update_globals(&self, camera: &Camera, lighting: &Lighting) {
        let uniform = GlobalUniform {
            view: camera.view().to_cols_array_2d(),
            projection: camera.projection().to_cols_array_2d(),
            diffuse_mtrl: lighting.diffuse_material.to_array(),
            diffuse_light: lighting.diffuse_light.to_array(),
            ambient_mtrl: lighting.ambient_material.to_array(),
            ambient_light: lighting.ambient_light.to_array(),
            specular_mtrl: lighting.specular_material.to_array(),
            specular_light: lighting.specular_light.to_array(),
            light_dir_power: lighting.direction.extend(lighting.specular_power).into(),
            eye_pos: camera.eye().extend(1.0).into(),
        };
        self.queue
            .write_buffer(&self.global_buffer, 0, bytes_of(&uniform));
    }

    /// Draws the instances in the order given.
    ///
    /// The caller supplies opaque instances first and transparent ones
    /// pre-sorted; the renderer only switches pipelines along the way.
    pub fn render(
        &mut self,
        draw_list: &[&SceneInstance],
        fill: FillMode,
    ) -> Result<(), wgpu::SurfaceError> {
        let fill = self.effective_fill(fill);

        for instance in draw_list {
            self.ensure_mesh_loaded(&instance.mesh);
            self.ensure_pipeline((fill, instance.blend));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("renderer-encoder"),
            });

        // Per-object uniforms are uploaded before the pass begins
        let mut bind_groups = Vec::with_capacity(draw_list.len());
        for instance in draw_list {
            let constants = ObjectConstants {
                model: instance.world.to_cols_array_2d(),
            };
            let object_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("object-uniform"),
                    contents: bytes_of(&constants),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
            let object_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &self.object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                }],
                label: Some("object-bind-group"),
            });
            bind_groups.push(object_bind_group);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("main-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.global_bind_group, &[]);
        pass.set_bind_group(2, &self.texture_bind_group, &[]);
        pass.set_blend_constant(BLEND_FACTOR);

        let mut bound = None;
        for (instance, bind_group) in draw_list.iter().zip(bind_groups.iter()) {
            let key = (fill, instance.blend);
            if bound != Some(key) {
                let Some(pipeline) = self.pipelines.get(&key) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                bound = Some(key);
            }

            let mesh = self
                .mesh_cache
                .get(&instance.mesh)
                .unwrap_or(&self.default_mesh);
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            pass.set_bind_group(1, bind_group, &[]);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        drop(pass); // explicit to satisfy lifetimes on some backends
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn effective_fill(&mut self, fill: FillMode) -> FillMode {
        if fill == FillMode::Wireframe && !self.wireframe_supported {
            if !self.wireframe_warned {
                warn!("adapter does not support line fill, drawing solid instead");
                self.wireframe_warned = true;
            }
            return FillMode::Solid;
        }
        fill
    }

    fn ensure_pipeline(&mut self, key: (FillMode, BlendMode)) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let pipeline = build_pipeline(
            &self.device,
            &self.pipeline_layout,
            &self.shader,
            self.config.format,
            key,
        );
        self.pipelines.insert(key, pipeline);
    }

    fn ensure_mesh_loaded(&mut self, source: &MeshSource) {
        if self.mesh_cache.contains_key(source) || self.missing_meshes.contains(source) {
            return;
        }
        match build_mesh_data(source) {
            Ok(data) => {
                let label = mesh_label(source);
                let buffers = MeshBuffers::from_mesh(&self.device, &data, label);
                self.mesh_cache.insert(source.clone(), buffers);
            }
            Err(err) => {
                error!("failed to load mesh {}: {err:?}", mesh_label(source));
                self.missing_meshes.insert(source.clone());
            }
        }
    }
}

/// Resolves a mesh source to geometry; only OBJ files can fail.
fn build_mesh_data(source: &MeshSource) -> Result<MeshData> {
    match source {
        MeshSource::Cube => Ok(mesh::cube()),
        MeshSource::Pyramid => Ok(mesh::pyramid()),
        MeshSource::Floor => Ok(mesh::floor_grid(FLOOR_SIDE, FLOOR_SPACING, FLOOR_HEIGHT)),
        MeshSource::Obj(path) => obj::load_obj_file(path),
    }
}

fn mesh_label(source: &MeshSource) -> &str {
    match source {
        MeshSource::Cube => "cube",
        MeshSource::Pyramid => "pyramid",
        MeshSource::Floor => "floor",
        MeshSource::Obj(path) => path,
    }
}

/// Blend state for a pass kind. The transparent state weighs the source
/// by its own colour and the destination by the pass blend constant.
fn blend_state(blend: BlendMode) -> Option<wgpu::BlendState> {
    match blend {
        BlendMode::Opaque => None,
        BlendMode::Transparent => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::Src,
                dst_factor: wgpu::BlendFactor::Constant,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::REPLACE,
        }),
    }
}

fn polygon_mode(fill: FillMode) -> wgpu::PolygonMode {
    match fill {
        FillMode::Solid => wgpu::PolygonMode::Fill,
        FillMode::Wireframe => wgpu::PolygonMode::Line,
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    (fill, blend): (FillMode, BlendMode),
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("renderer-pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: (3 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: (6 * std::mem::size_of::<f32>()) as u64,
                        shader_location: 2,
                    },
                ],
            }],
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: polygon_mode(fill),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: blend_state(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        multiview: None,
        cache: None,
    })
}

/// Uploads the generated albedo and pairs it with a linear repeat sampler.
fn create_albedo_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: CRATE_TEXTURE_SIZE,
        height: CRATE_TEXTURE_SIZE,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("crate-albedo"),
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
        &mesh::crate_texture(CRATE_TEXTURE_SIZE),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(CRATE_TEXTURE_SIZE * 4),
            rows_per_image: Some(CRATE_TEXTURE_SIZE),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("crate-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture-bind-group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_mesh(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct GlobalUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    diffuse_mtrl: [f32; 4],
    diffuse_light: [f32; 4],
    ambient_mtrl: [f32; 4],
    ambient_light: [f32; 4],
    specular_mtrl: [f32; 4],
    specular_light: [f32; 4],
    light_dir_power: [f32; 4],
    eye_pos: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectConstants {
    model: [[f32; 4]; 4],
}

const SHADER: &str = r#"
struct GlobalUniform {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    diffuse_mtrl: vec4<f32>,
    diffuse_light: vec4<f32>,
    ambient_mtrl: vec4<f32>,
    ambient_light: vec4<f32>,
    specular_mtrl: vec4<f32>,
    specular_light: vec4<f32>,
    light_dir_power: vec4<f32>,
    eye_pos: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

@group(2) @binding(0)
var albedo: texture_2d<f32>;

@group(2) @binding(1)
var albedo_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.projection * globals.view * world_position;
    out.world_pos = world_position.xyz;
    out.normal = normalize((object.model * vec4<f32>(input.normal, 0.0)).xyz);
    out.uv = input.uv;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(albedo, albedo_sampler, input.uv);
    let normal = normalize(input.normal);
    let light_dir = normalize(globals.light_dir_power.xyz);
    let to_eye = normalize(globals.eye_pos.xyz - input.world_pos);

    let diffuse_amount = max(dot(light_dir, normal), 0.0);
    let diffuse = diffuse_amount * globals.diffuse_mtrl * globals.diffuse_light;
    let ambient = globals.ambient_mtrl * globals.ambient_light;

    let reflected = reflect(-light_dir, normal);
    let specular_amount = pow(max(dot(reflected, to_eye), 0.0), globals.light_dir_power.w);
    let specular = specular_amount * globals.specular_mtrl * globals.specular_light;

    let colour = texel.rgb * (ambient.rgb + diffuse.rgb) + specular.rgb;
    return vec4<f32>(colour, texel.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_the_shader_structs() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 256);
        assert_eq!(std::mem::size_of::<ObjectConstants>(), 64);
    }

    #[test]
    fn transparent_blend_uses_the_pass_constant() {
        assert!(blend_state(BlendMode::Opaque).is_none());
        let state = blend_state(BlendMode::Transparent).unwrap();
        assert_eq!(state.color.src_factor, wgpu::BlendFactor::Src);
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::Constant);
        assert_eq!(state.alpha, wgpu::BlendComponent::REPLACE);
    }

    #[test]
    fn wireframe_maps_to_line_fill() {
        assert_eq!(polygon_mode(FillMode::Solid), wgpu::PolygonMode::Fill);
        assert_eq!(polygon_mode(FillMode::Wireframe), wgpu::PolygonMode::Line);
    }

    #[test]
    fn builtin_mesh_sources_always_resolve() {
        assert_eq!(build_mesh_data(&MeshSource::Cube).unwrap().vertices.len(), 8);
        assert_eq!(
            build_mesh_data(&MeshSource::Pyramid).unwrap().vertices.len(),
            5
        );
        assert_eq!(
            build_mesh_data(&MeshSource::Floor).unwrap().vertices.len(),
            25
        );
        assert!(build_mesh_data(&MeshSource::Obj("does-not-exist.obj".into())).is_err());
    }
}
