//! Error types shared across the runtime.

use thiserror::Error;

/// Error type for runtime-wide concerns outside the GPU and asset layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Window creation or event-loop failure.
    #[error("Window error: {0}")]
    Window(String),

    /// Invalid or inconsistent settings.
    #[error("Config error: {0}")]
    Config(String),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything that indicates a bug rather than a caller mistake.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the runtime's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
