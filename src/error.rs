//! # Editor Errors
//!
//! Failures that can stop the editor from starting. Editing itself never
//! fails: misses and out-of-range edits are silent no-ops.

use std::path::PathBuf;

/// Startup and asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to read shader {path}: {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GPU initialization failed: {message}")]
    GraphicsInit { message: String },

    #[error("GPU resource '{name}' was not created")]
    MissingGpuResource { name: &'static str },

    #[error("Failed to decode texture {path}: {source}")]
    TextureDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl EditorError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
