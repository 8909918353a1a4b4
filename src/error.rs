//! Typed failures of the texture registry.

use std::path::PathBuf;

use thiserror::Error;

/// Why a texture could not be registered.
///
/// None of these is fatal to scene preparation: the composer logs them and
/// carries on, and objects referring to the missing tag draw untextured.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },

    #[error("image {label} has {channels} colour channels, only 3 or 4 are supported")]
    UnsupportedChannels { label: String, channels: u8 },

    #[error("texture table is full ({capacity} slots), cannot register {tag}")]
    CapacityExceeded { tag: String, capacity: usize },

    #[error("backend rejected texture {tag}: {reason}")]
    Backend { tag: String, reason: String },
}
