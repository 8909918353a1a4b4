//! Headless host: prepares a scene once, renders one frame offscreen and reads
//! it back.
//!
//! This is the stand-in for a window loop. Per frame it does exactly what a
//! windowed host would do:
//!
//! 1. Let the composer upload uniforms and record draws (`render_scene`)
//! 2. Copy the light block into the frame uniforms
//! 3. Submit the recorded draws in one pass
//! 4. Copy the target into a mappable buffer and wait for it

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context as _, anyhow};
use image::RgbaImage;
use instant::{Duration, Instant};

use crate::{
    composer::SceneComposer,
    config::SceneConfig,
    context::Context,
    render::{GpuMeshes, SceneRenderer},
    resources::texture::GpuTextures,
    scene::SceneDescription,
    shading::{GpuShader, UniformState},
};

/// The composer wired to the wgpu collaborators.
pub type GpuComposer = SceneComposer<GpuShader, GpuMeshes, GpuTextures>;

/// A prepared scene bound to a GPU context, ready to render frames.
pub struct SceneHost {
    pub ctx: Context,
    pub composer: GpuComposer,
    renderer: SceneRenderer,
    uniforms: Rc<RefCell<UniformState>>,
}

impl SceneHost {
    pub async fn new(config: &SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(config).await?;
        let uniforms = Rc::new(RefCell::new(UniformState::new(config.uniform_names.clone())));
        let shader = GpuShader::new(uniforms.clone());
        let meshes = GpuMeshes::new(&ctx.device, uniforms.clone());
        let textures = GpuTextures::new(&ctx.device, &ctx.queue);
        let renderer = SceneRenderer::new(&ctx, textures.layout());
        let composer = SceneComposer::new(
            Some(shader),
            meshes,
            textures,
            config.uniform_names.clone(),
        );
        Ok(Self {
            ctx,
            composer,
            renderer,
            uniforms,
        })
    }

    /// Render one frame of `scene` and return it as an image.
    pub async fn render_frame(&mut self, scene: &SceneDescription) -> anyhow::Result<RgbaImage> {
        let start = Instant::now();
        self.composer.render_scene(scene);
        let draws = self.composer.meshes_mut().take_draws();
        let lights = self.uniforms.borrow().lights;
        self.ctx.frame.write_lights(&self.ctx.queue, &lights);

        self.renderer.render(
            &self.ctx,
            self.composer.meshes(),
            self.composer.textures().backend(),
            &draws,
        );
        let img = read_back(&self.ctx).await?;
        log::info!("Rendered {} draws of {} in {:?}", draws.len(), scene.name, start.elapsed());
        Ok(img)
    }
}

/// Bytes per row of a texture copy must be a multiple of this.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

async fn read_back(ctx: &Context) -> anyhow::Result<RgbaImage> {
    let (width, height) = (ctx.width, ctx.height);
    let bytes_per_row = padded_bytes_per_row(width);
    let output_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        size: (bytes_per_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        label: Some("Read-back Buffer"),
        mapped_at_creation: false,
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Read-back Encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            aspect: wgpu::TextureAspect::All,
            texture: &ctx.target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
    let buffer_slice = output_buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        // The receiver only goes away if the frame is abandoned.
        let _ = tx.send(result);
    });
    ctx.device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })
        .context("GPU did not finish the frame")?;
    rx.receive()
        .await
        .ok_or_else(|| anyhow!("read-back channel closed"))?
        .context("could not map the read-back buffer")?;

    let data = buffer_slice.get_mapped_range();
    let row_bytes = (width * 4) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in data.chunks(bytes_per_row as usize).take(height as usize) {
        pixels.extend_from_slice(&row[..row_bytes]);
    }
    drop(data);
    output_buffer.unmap();

    RgbaImage::from_raw(width, height, pixels).ok_or_else(|| anyhow!("read-back size mismatch"))
}

/// Prepare `scene` and render a single frame of it.
pub async fn render_scene_to_image(
    config: &SceneConfig,
    scene: &SceneDescription,
) -> anyhow::Result<RgbaImage> {
    let mut host = SceneHost::new(config).await?;
    if let Some(summary) = host.composer.prepare_scene(scene, &config.asset_root).await {
        if summary.texture_failures > 0 {
            log::warn!(
                "{} of {} textures of {} could not be loaded",
                summary.texture_failures,
                scene.textures.len(),
                scene.name
            );
        }
    }
    host.render_frame(scene).await
}

/// Blocking wrapper around [`render_scene_to_image`].
pub fn run(config: &SceneConfig, scene: &SceneDescription) -> anyhow::Result<RgbaImage> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(render_scene_to_image(config, scene))
}
