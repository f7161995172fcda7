use gridwave_core::renderer::{COLOR_ATTRIBUTE, POSITION_ATTRIBUTE, TRANSFORM_UNIFORM};
use gridwave_core::{BufferHandle, RenderError, Renderer};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

const TRANSFORM_UBO_SIZE: u64 = (16 * std::mem::size_of::<f32>()) as u64;

/// Vertex-buffer slot for each attribute the grid shader reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Slot {
    Position,
    Color,
}

impl Slot {
    fn for_attribute(name: &str) -> Option<Self> {
        match name {
            POSITION_ATTRIBUTE => Some(Slot::Position),
            COLOR_ATTRIBUTE => Some(Slot::Color),
            _ => None,
        }
    }

    fn components(self) -> u32 {
        match self {
            Slot::Position => 2,
            Slot::Color => 3,
        }
    }

    fn attribute(self) -> &'static str {
        match self {
            Slot::Position => POSITION_ATTRIBUTE,
            Slot::Color => COLOR_ATTRIBUTE,
        }
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: (Slot::Position.components() as usize * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: (Slot::Color.components() as usize * std::mem::size_of::<f32>()) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &COLOR_ATTRS,
        },
    ]
}

/// Draws the cell grid: two static vertex buffers (positions, colors) and
/// one transform uniform.
///
/// GPU objects are created lazily on first use and kept across frames. Use
/// [`GridRenderer::frame`] to get a [`Renderer`] bound to the current surface
/// frame.
#[derive(Default)]
pub struct GridRenderer {
    clear_color: Color,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    transform_ubo: Option<wgpu::Buffer>,

    buffers: Vec<wgpu::Buffer>,
    position_buffer: Option<BufferHandle>,
    color_buffer: Option<BufferHandle>,
}

impl GridRenderer {
    pub fn new(clear_color: Color) -> Self {
        Self { clear_color, ..Self::default() }
    }

    /// Wraps this renderer for one surface frame.
    pub fn frame<'a, 't>(
        &'a mut self,
        ctx: &'a RenderCtx<'a>,
        target: &'a mut RenderTarget<'t>,
    ) -> GridFrame<'a, 't> {
        GridFrame { renderer: self, ctx, target }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gridwave grid shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/grid.wgsl").into()),
        });

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gridwave grid bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(TRANSFORM_UBO_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gridwave grid pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let buffers = vertex_layouts();
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gridwave grid pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("grid pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.transform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.transform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let transform_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gridwave transform ubo"),
            contents: bytemuck::cast_slice(&gridwave_core::Transform::IDENTITY.to_matrix()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gridwave grid bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transform_ubo.as_entire_binding(),
            }],
        });

        self.transform_ubo = Some(transform_ubo);
        self.bind_group = Some(bind_group);
    }

    fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(handle.0 as usize)
    }

    fn bound(&self, slot: Slot) -> Result<&wgpu::Buffer, RenderError> {
        let handle = match slot {
            Slot::Position => self.position_buffer,
            Slot::Color => self.color_buffer,
        };
        handle
            .and_then(|h| self.buffer(h))
            .ok_or(RenderError::Unbound(slot.attribute()))
    }
}

/// [`GridRenderer`] bound to one acquired surface frame.
pub struct GridFrame<'a, 't> {
    renderer: &'a mut GridRenderer,
    ctx: &'a RenderCtx<'a>,
    target: &'a mut RenderTarget<'t>,
}

fn begin_pass<'t>(
    target: &'t mut RenderTarget<'_>,
    load: wgpu::LoadOp<wgpu::Color>,
    label: &str,
) -> wgpu::RenderPass<'t> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

impl Renderer for GridFrame<'_, '_> {
    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferHandle, RenderError> {
        let index = u32::try_from(self.renderer.buffers.len())
            .map_err(|_| RenderError::Backend("too many buffers".to_string()))?;

        let buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gridwave grid vbo"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.renderer.buffers.push(buffer);

        log::debug!("created vertex buffer {index} ({} floats)", data.len());
        Ok(BufferHandle(index))
    }

    fn bind_attribute(
        &mut self,
        name: &str,
        buffer: BufferHandle,
        components_per_vertex: u32,
    ) -> Result<(), RenderError> {
        let slot = Slot::for_attribute(name).ok_or_else(|| RenderError::UnknownAttribute(name.to_string()))?;
        if slot.components() != components_per_vertex {
            return Err(RenderError::AttributeComponents {
                name: name.to_string(),
                expected: slot.components(),
                got: components_per_vertex,
            });
        }
        if self.renderer.buffer(buffer).is_none() {
            return Err(RenderError::UnknownBuffer(buffer));
        }

        match slot {
            Slot::Position => self.renderer.position_buffer = Some(buffer),
            Slot::Color => self.renderer.color_buffer = Some(buffer),
        }
        Ok(())
    }

    fn set_uniform_matrix4(&mut self, name: &str, matrix: &[f32; 16]) -> Result<(), RenderError> {
        if name != TRANSFORM_UNIFORM {
            return Err(RenderError::UnknownUniform(name.to_string()));
        }
        self.renderer.ensure_pipeline(self.ctx);
        self.renderer.ensure_bindings(self.ctx);

        let ubo = self
            .renderer
            .transform_ubo
            .as_ref()
            .ok_or_else(|| RenderError::Backend("transform uniform buffer missing".to_string()))?;
        self.ctx.queue.write_buffer(ubo, 0, bytemuck::cast_slice(matrix));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        let color = self.renderer.clear_color.to_wgpu();
        let _rpass = begin_pass(self.target, wgpu::LoadOp::Clear(color), "gridwave clear");
        Ok(())
    }

    fn draw_triangles(&mut self, vertex_count: u32) -> Result<(), RenderError> {
        self.renderer.ensure_pipeline(self.ctx);
        self.renderer.ensure_bindings(self.ctx);

        let renderer: &GridRenderer = &*self.renderer;
        let positions = renderer.bound(Slot::Position)?;
        let colors = renderer.bound(Slot::Color)?;
        let (Some(pipeline), Some(bind_group)) = (renderer.pipeline.as_ref(), renderer.bind_group.as_ref())
        else {
            return Err(RenderError::Backend("grid pipeline not initialized".to_string()));
        };

        let mut rpass = begin_pass(self.target, wgpu::LoadOp::Load, "gridwave grid pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, positions.slice(..));
        rpass.set_vertex_buffer(1, colors.slice(..));
        rpass.draw(0..vertex_count, 0..1);
        Ok(())
    }
}
