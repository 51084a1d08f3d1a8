//! Device boundary and GPU resource management.
//!
//! This crate owns everything the runtime knows about the GPU without
//! knowing a graphics API:
//! - The [`GpuBackend`] trait, the device boundary over which geometry and
//!   texture uploads, per-frame synchronization, command recording,
//!   submission and presentation happen
//! - Opaque object ids ([`BufferId`], [`ImageId`], ...) standing in for
//!   backend-owned device objects
//! - The [`ResourcePool`] handing out stable, recyclable handles for
//!   GPU-resident geometry and textures
//! - [`HeadlessGpu`], a deterministic backend implementation with a
//!   simulated in-order completion queue, used by tests and the demo

mod backend;
mod error;
mod headless;
mod pool;
mod vertex;

pub use backend::{
    AcquireOutcome, BufferId, DrawCommand, GeometryBuffers, GpuBackend, ImageId, ImageViewId,
    PresentOutcome, SamplerId, TextureImages,
};
pub use error::{GpuError, GpuResult};
pub use headless::HeadlessGpu;
pub use pool::{GeometryHandle, ResourcePool, TextureHandle, INITIAL_POOL_CAPACITY};
pub use vertex::{DecodedImage, DecodedMesh, Vertex};

/// Maximum number of frames that can be processed concurrently.
///
/// Two slots let the CPU prepare the next frame while the GPU renders the
/// current one; every per-frame object (sync primitives, uniform buffers,
/// command streams) exists once per slot.
pub const MAX_FRAMES_IN_FLIGHT: usize = 2;
