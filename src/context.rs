//! Headless GPU context: device, queue, render targets and the per-frame
//! camera and light uniforms.

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, CameraUniform},
    config::SceneConfig,
    data_structures::texture::Texture,
    shading::LightsUniform,
};

/// Colour format of the offscreen target. Shader outputs are stored as-is, no
/// sRGB encoding, so flat colours land in the image unchanged.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Camera and light buffers bound at `@group(0)`.
#[derive(Debug)]
pub struct FrameResources {
    pub camera: Camera,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub lights_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl FrameResources {
    fn new(device: &wgpu::Device, camera: Camera, aspect: f32) -> Self {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, aspect);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[LightsUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
            label: Some("frame_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        Self {
            camera,
            camera_uniform,
            camera_buffer,
            lights_buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write_lights(&self, queue: &wgpu::Queue, lights: &LightsUniform) {
        queue.write_buffer(&self.lights_buffer, 0, bytemuck::cast_slice(&[*lights]));
    }
}

#[derive(Debug)]
pub struct Context {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    pub(crate) target: Texture,
    pub(crate) depth_texture: Texture,
    pub frame: FrameResources,
}

impl Context {
    pub async fn new(config: &SceneConfig) -> anyhow::Result<Self> {
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter available")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scene-composer device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                ..Default::default()
            })
            .await
            .context("could not create a GPU device")?;

        let size = [config.width.max(1), config.height.max(1)];
        let target = Texture::create_render_target(&device, size, TARGET_FORMAT);
        let depth_texture = Texture::create_depth_texture(&device, size, "depth_texture");
        let frame = FrameResources::new(&device, config.camera, config.aspect());

        Ok(Self {
            device,
            queue,
            width: size[0],
            height: size[1],
            clear_colour: config.clear_colour,
            target,
            depth_texture,
            frame,
        })
    }
}
