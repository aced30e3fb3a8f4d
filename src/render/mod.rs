//! wgpu renderer: surface setup, the shared arena's GPU copies, and
//! the per-frame draw pass assembly for the three shading modes.

pub mod camera;
pub mod pick;

use std::num::NonZeroU64;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::scene::{ObjectKind, RenderMode, Scene, AXIS_VERTEX_COUNT};
use pick::PickTarget;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Dynamic-offset stride for per-draw uniforms. Covers the uniform
/// struct size and satisfies the 256-byte minimum offset alignment.
const UNIFORM_STRIDE: u64 = 256;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
    a: 1.0,
};

const SELECTED_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
const MARKER_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const OUTLINE_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to acquire graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("pick readback failed: {0}")]
    PickReadback(String),
    #[error("renderer invariant violated: {0}")]
    Internal(&'static str),
}

/// Interleaved arena vertex. The two normal slots let one buffer serve
/// both flat and smooth shading; the shader picks per draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ArenaVertex {
    position: [f32; 3],
    color: [f32; 3],
    face_normal: [f32; 3],
    vertex_normal: [f32; 3],
}

impl ArenaVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ArenaVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x3,
            3 => Float32x3,
        ],
    };
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_pos: [f32; 4],
}

/// Shade modes understood by the fragment shader.
const SHADE_UNIFORM: u32 = 0;
const SHADE_VERTEX_COLOR: u32 = 1;
const SHADE_LIT: u32 = 2;

const NORMALS_FACE: u32 = 0;
const NORMALS_VERTEX: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
    color: [f32; 4],
    /// x: shade mode, y: normal source, z: pick id, w: unused.
    params: [u32; 4],
}

impl ObjectUniform {
    fn new(model: Mat4, color: Vec4, shade: u32, normals: u32, pick_id: u32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            color: color.to_array(),
            params: [shade, normals, pick_id, 0],
        }
    }
}

/// How one draw call addresses the arena buffers.
#[derive(Debug, Clone, Copy)]
enum Geometry {
    /// Non-indexed range of arena vertices (triangle fills, axes).
    Vertices { first: u32, count: u32 },
    /// Range of the shared edge index buffer (line-list wireframes).
    Edges { first: u32, count: u32 },
}

#[derive(Debug, Clone, Copy)]
struct DrawCall {
    uniform: u32,
    geometry: Geometry,
}

/// Per-frame draw lists. The main list preserves the fixed pass order
/// (axes, marker, then objects with fill before outline); the pick
/// list carries one draw per pickable object.
#[derive(Debug, Default)]
struct FramePlan {
    uniforms: Vec<ObjectUniform>,
    main_tris: Vec<DrawCall>,
    main_lines: Vec<DrawCall>,
    pick_tris: Vec<DrawCall>,
    pick_lines: Vec<DrawCall>,
}

impl FramePlan {
    fn push_uniform(&mut self, uniform: ObjectUniform) -> u32 {
        let index = self.uniforms.len() as u32;
        self.uniforms.push(uniform);
        index
    }
}

pub struct RenderContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: u32,

    mesh_tri_pipeline: wgpu::RenderPipeline,
    mesh_line_pipeline: wgpu::RenderPipeline,
    pick_tri_pipeline: wgpu::RenderPipeline,
    pick_line_pipeline: wgpu::RenderPipeline,

    vertex_buffer: Option<wgpu::Buffer>,
    edge_buffer: Option<wgpu::Buffer>,
    uploaded_revision: Option<u64>,

    pick: PickTarget,
}

impl RenderContext {
    pub fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))?;
        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("meshview device"),
            ..Default::default()
        }))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame uniforms"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<FrameUniform>() as u64
                    ),
                },
                count: None,
            }],
        });
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame uniform buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame bind group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object uniforms"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<ObjectUniform>() as u64
                    ),
                },
                count: None,
            }],
        });
        let object_capacity = 64;
        let (object_buffer, object_bind_group) =
            create_object_buffer(&device, &object_layout, object_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh pipeline layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        let pick_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pick shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("pick.wgsl").into()),
        });

        let mesh_tri_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &mesh_shader,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::CompareFunction::Less,
        );
        // LessEqual lets the flat-mode outline pass sit on its fill.
        let mesh_line_pipeline = create_mesh_pipeline(
            &device,
            &pipeline_layout,
            &mesh_shader,
            format,
            wgpu::PrimitiveTopology::LineList,
            wgpu::CompareFunction::LessEqual,
        );
        let pick_tri_pipeline = create_pick_pipeline(
            &device,
            &pipeline_layout,
            &pick_shader,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let pick_line_pipeline = create_pick_pipeline(
            &device,
            &pipeline_layout,
            &pick_shader,
            wgpu::PrimitiveTopology::LineList,
        );

        let pick = PickTarget::new(&device, config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            frame_buffer,
            frame_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity,
            mesh_tri_pipeline,
            mesh_line_pipeline,
            pick_tri_pipeline,
            pick_line_pipeline,
            vertex_buffer: None,
            edge_buffer: None,
            uploaded_revision: None,
            pick,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
        self.pick = PickTarget::new(&self.device, width, height);
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Re-uploads the arena's GPU copies when objects have been
    /// appended since the last frame.
    fn sync_arena(&mut self, scene: &Scene) {
        if self.uploaded_revision == Some(scene.arena.revision()) && self.vertex_buffer.is_some() {
            return;
        }
        let arena = &scene.arena;
        let vertices: Vec<ArenaVertex> = (0..arena.len())
            .map(|i| ArenaVertex {
                position: arena.positions[i].to_array(),
                color: arena.colors[i].to_array(),
                face_normal: arena.face_normals[i].to_array(),
                vertex_normal: arena.vertex_normals[i].to_array(),
            })
            .collect();

        // Two indices per vertex: each triangle contributes its three
        // edges to the line list.
        let mut edges: Vec<u32> = Vec::with_capacity((arena.len() - AXIS_VERTEX_COUNT) * 2);
        for tri_start in (AXIS_VERTEX_COUNT..arena.len()).step_by(3) {
            let v = tri_start as u32;
            edges.extend_from_slice(&[v, v + 1, v + 1, v + 2, v + 2, v]);
        }

        self.vertex_buffer = Some(self.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("arena vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
        self.edge_buffer = if edges.is_empty() {
            None
        } else {
            Some(
                self.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("arena edges"),
                        contents: bytemuck::cast_slice(&edges),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
            )
        };
        self.uploaded_revision = Some(arena.revision());
        log::debug!(
            "arena upload: {} vertices, {} edge indices",
            vertices.len(),
            (arena.len() - AXIS_VERTEX_COUNT) * 2
        );
    }

    /// Builds the frame's uniform table and draw lists from scene
    /// state. Pass order within the main lists matches the draw order:
    /// axes, light marker, then each object (fill before outline).
    fn plan_frame(&self, scene: &Scene) -> FramePlan {
        let mut plan = FramePlan::default();

        // Axis lines are drawn from the raw vertex range and never
        // participate in picking.
        let axes = plan.push_uniform(ObjectUniform::new(
            Mat4::IDENTITY,
            Vec4::ONE,
            SHADE_VERTEX_COLOR,
            NORMALS_FACE,
            0,
        ));
        plan.main_lines.push(DrawCall {
            uniform: axes,
            geometry: Geometry::Vertices {
                first: 0,
                count: AXIS_VERTEX_COUNT as u32,
            },
        });

        for (index, object) in scene.objects.iter().enumerate() {
            let selected = scene.selected == Some(index);
            let model = object.model_matrix();
            let pick_id = index as u32 + 1;
            let fill = Geometry::Vertices {
                first: object.offset as u32,
                count: object.len as u32,
            };
            let outline = Geometry::Edges {
                first: ((object.offset - AXIS_VERTEX_COUNT) * 2) as u32,
                count: (object.len * 2) as u32,
            };

            if object.kind == ObjectKind::LightMarker {
                let color = if selected { SELECTED_COLOR } else { MARKER_COLOR };
                let uniform = plan.push_uniform(ObjectUniform::new(
                    model,
                    color,
                    SHADE_UNIFORM,
                    NORMALS_FACE,
                    pick_id,
                ));
                plan.main_tris.push(DrawCall {
                    uniform,
                    geometry: fill,
                });
                plan.pick_tris.push(DrawCall {
                    uniform,
                    geometry: fill,
                });
                continue;
            }

            // A selected object is drawn in uniform yellow, unlit,
            // whatever its render mode.
            let (shade, color) = if selected {
                (SHADE_UNIFORM, SELECTED_COLOR)
            } else {
                (SHADE_LIT, Vec4::ONE)
            };

            match object.render_mode {
                RenderMode::Wireframe => {
                    let uniform = plan.push_uniform(ObjectUniform::new(
                        model,
                        color,
                        shade,
                        NORMALS_FACE,
                        pick_id,
                    ));
                    plan.main_lines.push(DrawCall {
                        uniform,
                        geometry: outline,
                    });
                    plan.pick_lines.push(DrawCall {
                        uniform,
                        geometry: outline,
                    });
                }
                RenderMode::Flat => {
                    let uniform = plan.push_uniform(ObjectUniform::new(
                        model,
                        color,
                        shade,
                        NORMALS_FACE,
                        pick_id,
                    ));
                    plan.main_tris.push(DrawCall {
                        uniform,
                        geometry: fill,
                    });
                    plan.pick_tris.push(DrawCall {
                        uniform,
                        geometry: fill,
                    });
                    let edge_uniform = plan.push_uniform(ObjectUniform::new(
                        model,
                        OUTLINE_COLOR,
                        SHADE_UNIFORM,
                        NORMALS_FACE,
                        pick_id,
                    ));
                    plan.main_lines.push(DrawCall {
                        uniform: edge_uniform,
                        geometry: outline,
                    });
                }
                RenderMode::Phong => {
                    let uniform = plan.push_uniform(ObjectUniform::new(
                        model,
                        color,
                        shade,
                        NORMALS_VERTEX,
                        pick_id,
                    ));
                    plan.main_tris.push(DrawCall {
                        uniform,
                        geometry: fill,
                    });
                    plan.pick_tris.push(DrawCall {
                        uniform,
                        geometry: fill,
                    });
                }
            }
        }
        plan
    }

    fn upload_uniforms(&mut self, scene: &Scene, plan: &FramePlan) {
        let frame = FrameUniform {
            view_proj: scene.camera.view_projection(self.aspect()).to_cols_array_2d(),
            eye: Vec4::from((scene.camera.eye(), 1.0)).to_array(),
            light_pos: Vec4::from((scene.light_position(), 1.0)).to_array(),
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let needed = plan.uniforms.len() as u32;
        if needed > self.object_capacity {
            self.object_capacity = needed.next_power_of_two();
            let (buffer, bind_group) =
                create_object_buffer(&self.device, &self.object_layout, self.object_capacity);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
        }
        let mut staged = vec![0u8; plan.uniforms.len() * UNIFORM_STRIDE as usize];
        for (i, uniform) in plan.uniforms.iter().enumerate() {
            let offset = i * UNIFORM_STRIDE as usize;
            let bytes = bytemuck::bytes_of(uniform);
            staged[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        self.queue.write_buffer(&self.object_buffer, 0, &staged);
    }

    fn encode_draws(&self, pass: &mut wgpu::RenderPass<'_>, calls: &[DrawCall]) {
        for call in calls {
            pass.set_bind_group(
                1,
                &self.object_bind_group,
                &[call.uniform * UNIFORM_STRIDE as u32],
            );
            match call.geometry {
                Geometry::Vertices { first, count } => {
                    pass.draw(first..first + count, 0..1);
                }
                Geometry::Edges { first, count } => {
                    pass.draw_indexed(first..first + count, 0, 0..1);
                }
            }
        }
    }

    /// Renders one frame. When `pick_at` carries pixel coordinates, an
    /// identifier pass runs alongside and its readback is returned:
    /// `Some(Some(i))` for a hit on object `i`, `Some(None)` for
    /// background.
    pub fn render(
        &mut self,
        scene: &Scene,
        pick_at: Option<(u32, u32)>,
    ) -> Result<Option<Option<usize>>, RenderError> {
        self.sync_arena(scene);
        let plan = self.plan_frame(scene);
        self.upload_uniforms(scene, &plan);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e.into()),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else {
            return Err(RenderError::Internal("arena buffers missing after sync"));
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
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
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            if let Some(edges) = self.edge_buffer.as_ref() {
                pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
            }

            pass.set_pipeline(&self.mesh_tri_pipeline);
            self.encode_draws(&mut pass, &plan.main_tris);
            pass.set_pipeline(&self.mesh_line_pipeline);
            self.encode_draws(&mut pass, &plan.main_lines);
        }

        let pick_requested = pick_at.is_some();
        if let Some((x, y)) = pick_at {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pick pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.pick.view(),
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // 0 is the no-object sentinel.
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.pick.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            if let Some(edges) = self.edge_buffer.as_ref() {
                pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
            }
            pass.set_pipeline(&self.pick_tri_pipeline);
            self.encode_draws(&mut pass, &plan.pick_tris);
            pass.set_pipeline(&self.pick_line_pipeline);
            self.encode_draws(&mut pass, &plan.pick_lines);
            drop(pass);

            self.pick.encode_readback(&mut encoder, x, y);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        let hit = if pick_requested {
            Some(self.pick.resolve(&self.device)?)
        } else {
            None
        };

        frame.present();
        Ok(hit)
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("object uniform buffer"),
        size: capacity as u64 * UNIFORM_STRIDE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("object bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("mesh pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[ArenaVertex::LAYOUT],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_pick_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pick pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[ArenaVertex::LAYOUT],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: pick::PICK_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
