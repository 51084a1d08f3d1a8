//! GPU boundary error types.

use thiserror::Error;

/// Error type for device-boundary and resource-pool operations.
#[derive(Error, Debug)]
pub enum GpuError {
    /// A resource id landed outside pool capacity after growth.
    #[error("Resource pool exhausted: id {id} exceeds capacity {capacity}")]
    PoolExhausted {
        /// The id that could not be backed.
        id: u32,
        /// Pool capacity at the time of the failure.
        capacity: u32,
    },

    /// A frame-slot index outside `[0, frames_in_flight)`.
    #[error("Invalid frame slot {slot} (frames in flight: {frames})")]
    InvalidFrameSlot {
        /// The offending slot index.
        slot: usize,
        /// Number of frame slots the backend owns.
        frames: usize,
    },

    /// Device object creation failed.
    #[error("Device object creation failed: {0}")]
    ObjectCreation(String),

    /// Submission was sequenced incorrectly (e.g. fence not reset).
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// The device was lost or another unrecoverable backend failure.
    #[error("Device error: {0}")]
    Device(String),
}

/// Result type alias for GPU operations.
pub type GpuResult<T> = std::result::Result<T, GpuError>;
