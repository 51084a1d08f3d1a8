//! Engine-level error type.

use thiserror::Error;

/// Error type spanning every layer the engine drives.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Device boundary or resource pool failure.
    #[error(transparent)]
    Gpu(#[from] ember_gpu::GpuError),

    /// Asset importing failure.
    #[error(transparent)]
    Asset(#[from] ember_assets::AssetError),

    /// Platform or configuration failure.
    #[error(transparent)]
    Core(#[from] ember_core::Error),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
