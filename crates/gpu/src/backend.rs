//! The device boundary.
//!
//! [`GpuBackend`] is the seam between the runtime core and a concrete
//! graphics device. The core calls it with plain sizes, counts and raw
//! byte slices and receives opaque object ids back; device initialization,
//! pipeline construction and the presentation surface all live behind it.
//!
//! Per-frame synchronization state (acquire semaphore, render-finished
//! semaphore, completion fence, uniform buffers) exists once per frame
//! slot and is addressed *only* by slot index. The target index returned
//! by [`GpuBackend::acquire_target`] is a parameter to
//! [`GpuBackend::present`] and nothing else; it is never used to index
//! synchronization objects.

use glam::Mat4;

use crate::error::GpuResult;
use crate::pool::{GeometryHandle, TextureHandle};
use crate::vertex::{DecodedImage, DecodedMesh};

macro_rules! object_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(pub u64);

        impl $name {
            /// The null id; never issued by a backend.
            pub const NULL: $name = $name(0);

            /// Whether this is the null id.
            #[inline]
            pub fn is_null(self) -> bool {
                self.0 == 0
            }
        }
    };
}

object_id!(
    /// Opaque id of a backend-owned buffer (and its memory).
    BufferId
);
object_id!(
    /// Opaque id of a backend-owned image (and its memory).
    ImageId
);
object_id!(
    /// Opaque id of a backend-owned image view.
    ImageViewId
);
object_id!(
    /// Opaque id of a backend-owned sampler.
    SamplerId
);

/// The backend object set backing one geometry: vertex and index buffers.
///
/// The backend pairs each buffer with its memory internally; destroying
/// the set releases both in reverse-acquisition order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryBuffers {
    /// Vertex buffer id.
    pub vertex_buffer: BufferId,
    /// Index buffer id.
    pub index_buffer: BufferId,
    /// Number of indices uploaded.
    pub index_count: u32,
}

/// The backend object set backing one texture: image, view and sampler.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureImages {
    /// Image id.
    pub image: ImageId,
    /// Image view id.
    pub view: ImageViewId,
    /// Sampler id.
    pub sampler: SamplerId,
}

/// One indexed draw emitted by the render walker.
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand {
    /// Geometry handle the draw was resolved from (for observability).
    pub mesh: GeometryHandle,
    /// Texture handle to sample from; the backend binds the image set it
    /// resolves to, or its default texture for a non-live handle.
    pub texture: TextureHandle,
    /// Vertex buffer to bind.
    pub vertex_buffer: BufferId,
    /// Index buffer to bind.
    pub index_buffer: BufferId,
    /// Number of indices to draw.
    pub index_count: u32,
    /// Binding set index, `slot * resource_count + mesh_handle`.
    pub binding_set: u32,
    /// World matrix pushed as the per-draw constant.
    pub world_matrix: Mat4,
}

/// Result of acquiring a presentable target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A target is available for rendering; the index is only ever passed
    /// back to [`GpuBackend::present`].
    Acquired(u32),
    /// The target set is stale (resize); rebuild before rendering.
    Stale,
}

/// Result of presenting a rendered target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    /// The frame was queued for presentation.
    Presented,
    /// The target set is stale; rebuild before the next frame.
    Stale,
}

/// A graphics device as seen by the runtime core.
///
/// Implementations own all device objects, the presentation target set and
/// `frames_in_flight` sets of per-slot synchronization primitives and
/// uniform buffers. All methods are called from the single runtime thread.
pub trait GpuBackend {
    /// Number of frame slots this backend owns.
    fn frames_in_flight(&self) -> usize;

    /// Upload a decoded mesh and return the backing buffer set.
    fn upload_geometry(&mut self, mesh: &DecodedMesh) -> GpuResult<GeometryBuffers>;

    /// Release a geometry buffer set immediately.
    fn destroy_geometry(&mut self, buffers: &GeometryBuffers);

    /// Upload a decoded image and return the backing image set.
    fn upload_texture(&mut self, image: &DecodedImage) -> GpuResult<TextureImages>;

    /// Release a texture image set immediately.
    fn destroy_texture(&mut self, images: &TextureImages);

    /// Rebuild the binding sets, one per (frame slot, resource) pair.
    ///
    /// Called whenever the resource count changes; all previously built
    /// sets are replaced.
    fn rebuild_binding_sets(&mut self, frame_count: usize, resource_count: usize) -> GpuResult<()>;

    /// Block until the slot's completion fence is signaled.
    ///
    /// This is the sole backpressure point bounding CPU run-ahead.
    fn wait_fence(&mut self, slot: usize) -> GpuResult<()>;

    /// Reset the slot's completion fence to unsignaled.
    fn reset_fence(&mut self, slot: usize) -> GpuResult<()>;

    /// Acquire the next presentable target, signaling the slot's acquire
    /// semaphore when it is ready.
    fn acquire_target(&mut self, slot: usize) -> GpuResult<AcquireOutcome>;

    /// Reset the slot's command stream and begin recording.
    fn begin_recording(&mut self, slot: usize) -> GpuResult<()>;

    /// Record one indexed draw into the slot's command stream.
    fn record_draw(&mut self, slot: usize, draw: DrawCommand);

    /// Write the slot's camera uniform buffer.
    ///
    /// Safe at the point the frame pipeline calls it: the slot's fence
    /// wait has already guaranteed the GPU finished reading the previous
    /// contents.
    fn write_camera_uniform(&mut self, slot: usize, bytes: &[u8]);

    /// Write the slot's lighting uniform buffer.
    fn write_lighting_uniform(&mut self, slot: usize, bytes: &[u8]);

    /// Submit the slot's command stream.
    ///
    /// The submission waits on the slot's acquire semaphore and signals
    /// its render-finished semaphore and completion fence.
    fn submit(&mut self, slot: usize) -> GpuResult<()>;

    /// Present the acquired target, waiting on the slot's render-finished
    /// semaphore. `target` is the index returned by
    /// [`GpuBackend::acquire_target`].
    fn present(&mut self, slot: usize, target: u32) -> GpuResult<PresentOutcome>;

    /// Current presentation target extent in pixels.
    fn surface_extent(&self) -> (u32, u32);

    /// Destroy and recreate all target-dependent objects at `extent`.
    fn recreate_surface(&mut self, extent: (u32, u32)) -> GpuResult<()>;

    /// Block until every in-flight frame has completed.
    fn wait_idle(&mut self) -> GpuResult<()>;
}
