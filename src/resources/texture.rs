use std::path::PathBuf;

use crate::{
    data_structures::texture::{DecodedImage, Texture},
    error::TextureError,
    registry::{TEXTURE_CAPACITY, TextureBackend},
};

/// Layout of the per-slot bind group: one filterable 2D texture and its sampler.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        label: Some("Scene texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &texture.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = crate::data_structures::texture::create_default_sampler(device);
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    })
}

pub async fn load_binary(path: PathBuf) -> Result<Vec<u8>, TextureError> {
    std::fs::read(&path).map_err(|source| TextureError::Io { path, source })
}

/// Decode image file contents into an upload-ready RGBA image.
///
/// Only 3 (RGB) and 4 (RGBA) channel images are accepted; grey and grey-alpha
/// files are rejected rather than silently expanded. The image is flipped
/// vertically so that its first row is the bottom of the picture.
pub fn decode_image(bytes: &[u8], label: &str) -> Result<DecodedImage, TextureError> {
    let img = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
        label: label.to_string(),
        source,
    })?;
    let channels = img.color().channel_count();
    if channels != 3 && channels != 4 {
        log::error!("Not implemented to handle image {label} with {channels} channels");
        return Err(TextureError::UnsupportedChannels {
            label: label.to_string(),
            channels,
        });
    }
    let rgba = img.flipv().to_rgba8();
    log::info!(
        "Loaded image {label}, width: {}, height: {}, channels: {channels}",
        rgba.width(),
        rgba.height()
    );
    Ok(DecodedImage {
        label: label.to_string(),
        channels,
        rgba,
    })
}

/// Refuse images the device cannot hold instead of letting wgpu fail
/// validation on `create_texture`.
pub fn check_dimensions(image: &DecodedImage, max_side: u32) -> Result<(), TextureError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 || width > max_side || height > max_side {
        return Err(TextureError::Backend {
            tag: image.label.clone(),
            reason: format!("{width}x{height} does not fit the device limit of {max_side} per side"),
        });
    }
    Ok(())
}

/// Handle of a texture created by [`GpuTextures`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// wgpu texture backend: owns the uploaded textures and one bind group per
/// texture unit (slot).
pub struct GpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    textures: Vec<Option<Texture>>,
    units: Vec<Option<(TextureId, wgpu::BindGroup)>>,
}

impl GpuTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            layout: texture_layout(device),
            textures: Vec::new(),
            units: (0..TEXTURE_CAPACITY).map(|_| None).collect(),
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group of the texture currently bound to `slot`.
    pub fn unit(&self, slot: usize) -> Option<&wgpu::BindGroup> {
        self.units
            .get(slot)
            .and_then(|unit| unit.as_ref())
            .map(|(_, group)| group)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }
}

impl TextureBackend for GpuTextures {
    type Handle = TextureId;

    fn create(&mut self, image: &DecodedImage) -> Result<TextureId, TextureError> {
        check_dimensions(image, self.device.limits().max_texture_dimension_2d)?;
        let texture = Texture::from_decoded(&self.device, &self.queue, image);
        self.textures.push(Some(texture));
        Ok(TextureId(self.textures.len() as u32 - 1))
    }

    fn bind(&mut self, slot: usize, handle: TextureId) {
        let Some(Some(texture)) = self.textures.get(handle.0 as usize) else {
            log::warn!("Texture {:?} does not exist, slot {slot} left unbound", handle);
            return;
        };
        let Some(unit) = self.units.get_mut(slot) else {
            log::warn!("Texture unit {slot} is out of range");
            return;
        };
        let group = texture_bind_group(
            &self.device,
            &self.layout,
            texture,
            &format!("texture unit {slot}"),
        );
        *unit = Some((handle, group));
    }

    fn release(&mut self, handle: TextureId) {
        for unit in self.units.iter_mut() {
            if matches!(unit, Some((bound, _)) if *bound == handle) {
                *unit = None;
            }
        }
        if let Some(slot) = self.textures.get_mut(handle.0 as usize) {
            if let Some(texture) = slot.take() {
                texture.texture.destroy();
            }
        }
    }
}
