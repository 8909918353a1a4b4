//! Draw recording and submission.
//!
//! The composer draws immediately: it uploads uniforms, then asks for a mesh.
//! wgpu wants all of a pass's data before the pass is encoded, so drawing is
//! split in two:
//!
//! - [`GpuMeshes`] is the composer's [`MeshProvider`]. Every `draw_mesh`
//!   snapshots the shared [`UniformState`] into a [`DrawCall`].
//! - [`SceneRenderer`] uploads the recorded blocks into one dynamic-offset
//!   uniform buffer and replays the calls in order in a single render pass.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    context::Context,
    data_structures::{
        mesh::{MeshKind, MeshProvider, MeshSettings},
        texture::Texture,
    },
    pipelines,
    resources::{
        mesh::{GpuMesh, load_primitive},
        texture::{GpuTextures, texture_bind_group},
    },
    shading::{ObjectUniform, UniformState},
};

/// One recorded draw: which mesh, with which uniforms and texture unit.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub uniform: ObjectUniform,
    /// Texture unit to sample, `None` for colour-only draws.
    pub texture_slot: Option<usize>,
}

/// wgpu mesh library: one uploaded mesh per [`MeshKind`], plus the draws
/// recorded since the last [`GpuMeshes::take_draws`].
pub struct GpuMeshes {
    device: wgpu::Device,
    state: Rc<RefCell<UniformState>>,
    meshes: HashMap<MeshKind, GpuMesh>,
    draws: Vec<DrawCall>,
}

impl GpuMeshes {
    pub fn new(device: &wgpu::Device, state: Rc<RefCell<UniformState>>) -> Self {
        Self {
            device: device.clone(),
            state,
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    pub fn mesh(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }

    pub fn loaded(&self) -> usize {
        self.meshes.len()
    }

    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }
}

impl MeshProvider for GpuMeshes {
    fn load_mesh(&mut self, kind: MeshKind, settings: &MeshSettings) {
        if self.meshes.contains_key(&kind) {
            log::debug!("Mesh {} is already loaded", kind.name());
            return;
        }
        let mesh = load_primitive(&self.device, kind, settings);
        self.meshes.insert(kind, mesh);
    }

    fn draw_mesh(&mut self, kind: MeshKind) {
        if !self.meshes.contains_key(&kind) {
            log::warn!("Mesh {} was never loaded, draw skipped", kind.name());
            return;
        }
        let state = self.state.borrow();
        let texture_slot = match state.object.use_texture {
            0 => None,
            _ => state.texture_slot,
        };
        self.draws.push(DrawCall {
            mesh: kind,
            uniform: state.object,
            texture_slot,
        });
    }
}

/// Owns the scene pipeline and the per-draw uniform buffer.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    capacity: usize,
    stride: u64,
    /// Bound for draws without a usable texture unit.
    blank: wgpu::BindGroup,
}

impl SceneRenderer {
    pub fn new(ctx: &Context, texture_layout: &wgpu::BindGroupLayout) -> Self {
        let device = &ctx.device;
        let object_layout = pipelines::scene::object_layout(device);
        let pipeline = pipelines::scene::mk_scene_pipeline(
            device,
            crate::context::TARGET_FORMAT,
            &ctx.frame.bind_group_layout,
            &object_layout,
            texture_layout,
        );

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let size = std::mem::size_of::<ObjectUniform>() as u64;
        let stride = size.div_ceil(alignment) * alignment;

        let capacity = 64;
        let (object_buffer, object_bind_group) =
            Self::object_resources(device, &object_layout, capacity, stride);

        let white = Texture::create_solid(device, &ctx.queue, [255, 255, 255, 255], "blank texture");
        let blank = texture_bind_group(device, texture_layout, &white, "blank texture unit");

        Self {
            pipeline,
            object_layout,
            object_buffer,
            object_bind_group,
            capacity,
            stride,
            blank,
        }
    }

    fn object_resources(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: capacity as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
            label: Some("object_bind_group"),
        });
        (buffer, bind_group)
    }

    fn upload_objects(&mut self, ctx: &Context, draws: &[DrawCall]) {
        if draws.len() > self.capacity {
            self.capacity = draws.len().next_power_of_two();
            log::debug!("Growing object uniform buffer to {} draws", self.capacity);
            let (buffer, bind_group) =
                Self::object_resources(&ctx.device, &self.object_layout, self.capacity, self.stride);
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
        }
        let stride = self.stride as usize;
        let mut staging = vec![0u8; draws.len() * stride];
        for (i, draw) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.uniform);
            staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        ctx.queue.write_buffer(&self.object_buffer, 0, &staging);
    }

    /// Encode and submit one frame of `draws` into the context's offscreen
    /// target.
    pub fn render(
        &mut self,
        ctx: &Context,
        meshes: &GpuMeshes,
        textures: &GpuTextures,
        draws: &[DrawCall],
    ) -> wgpu::SubmissionIndex {
        self.upload_objects(ctx, draws);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &ctx.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &ctx.frame.bind_group, &[]);
            for (i, draw) in draws.iter().enumerate() {
                let Some(mesh) = meshes.mesh(draw.mesh) else {
                    continue;
                };
                let offset = (i as u64 * self.stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(1, &self.object_bind_group, &[offset]);
                let unit = draw
                    .texture_slot
                    .and_then(|slot| textures.unit(slot))
                    .unwrap_or(&self.blank);
                render_pass.set_bind_group(2, unit, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
            }
        }
        ctx.queue.submit(std::iter::once(encoder.finish()))
    }
}
