//! Error types for asset importing.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for asset import operations.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Failed to parse an OBJ file.
    #[error("Failed to load OBJ file '{path}': {message}")]
    ObjLoad {
        /// Path to the file that failed to load.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// The model file parsed but contains no geometry.
    #[error("Model '{0}' contains no geometry")]
    NoGeometry(PathBuf),

    /// Image decoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Result type alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
