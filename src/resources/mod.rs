use std::path::Path;

use crate::{error::TextureError, scene::TextureSource};

/**
 * This module contains all logic for loading textures and meshes onto the GPU.
 */
pub mod mesh;
pub mod texture;

/// Read every listed texture file, relative to `asset_root` unless absolute.
///
/// Files are read one after another with blocking reads; results come back in
/// the order of `sources` so the caller can register them in slot order.
pub async fn load_texture_files(
    asset_root: &Path,
    sources: &[TextureSource],
) -> Vec<Result<Vec<u8>, TextureError>> {
    futures::future::join_all(
        sources
            .iter()
            .map(|source| texture::load_binary(asset_root.join(&source.path))),
    )
    .await
}
