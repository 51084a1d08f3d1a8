//! Deterministic headless device backend.
//!
//! [`HeadlessGpu`] implements the full [`GpuBackend`] boundary without a
//! graphics API. The simulated device completes submissions in FIFO order
//! when the host waits for them, so fence/semaphore sequencing errors and
//! the in-flight frame bound are observable from tests. Recorded draws and
//! uniform writes are captured per slot for inspection.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info};

use crate::backend::{
    AcquireOutcome, BufferId, DrawCommand, GeometryBuffers, GpuBackend, ImageId, ImageViewId,
    PresentOutcome, SamplerId, TextureImages,
};
use crate::error::{GpuError, GpuResult};
use crate::vertex::{DecodedImage, DecodedMesh};

/// Number of presentable targets the simulated surface owns.
const TARGET_COUNT: u32 = 3;

#[derive(Debug, Default)]
struct Slot {
    fence_signaled: bool,
    acquire_signaled: bool,
    render_finished: bool,
    recording: Vec<DrawCommand>,
    camera_uniform: Vec<u8>,
    lighting_uniform: Vec<u8>,
}

/// A deterministic, fully observable [`GpuBackend`] implementation.
///
/// Submitted frames stay "in flight" until the host waits on their slot's
/// fence (or on idle); completion is strictly in submission order, like a
/// single hardware queue. The high-water mark of concurrently in-flight
/// frames is recorded for assertions.
pub struct HeadlessGpu {
    extent: (u32, u32),
    slots: Vec<Slot>,

    next_object_id: u64,
    live_buffers: HashSet<BufferId>,
    live_images: HashSet<ImageId>,
    live_views: HashSet<ImageViewId>,
    live_samplers: HashSet<SamplerId>,

    in_flight: VecDeque<usize>,
    peak_in_flight: usize,

    next_target: u32,
    forced_stale_acquires: u32,
    forced_stale_presents: u32,
    surface_rebuilds: u32,

    binding_sets: usize,
    binding_rebuilds: u32,

    last_submission: Vec<DrawCommand>,
    submission_count: u64,
}

impl HeadlessGpu {
    /// Create a backend with `frames_in_flight` slots and a surface of the
    /// given extent. All fences start signaled so the first frame does not
    /// block.
    pub fn new(frames_in_flight: usize, extent: (u32, u32)) -> Self {
        let slots = (0..frames_in_flight)
            .map(|_| Slot {
                fence_signaled: true,
                ..Slot::default()
            })
            .collect();
        info!(frames_in_flight, ?extent, "Created headless device");
        Self {
            extent,
            slots,
            next_object_id: 1,
            live_buffers: HashSet::new(),
            live_images: HashSet::new(),
            live_views: HashSet::new(),
            live_samplers: HashSet::new(),
            in_flight: VecDeque::new(),
            peak_in_flight: 0,
            next_target: 0,
            forced_stale_acquires: 0,
            forced_stale_presents: 0,
            surface_rebuilds: 0,
            binding_sets: 0,
            binding_rebuilds: 0,
            last_submission: Vec::new(),
            submission_count: 0,
        }
    }

    fn check_slot(&self, slot: usize) -> GpuResult<()> {
        if slot >= self.slots.len() {
            return Err(GpuError::InvalidFrameSlot {
                slot,
                frames: self.slots.len(),
            });
        }
        Ok(())
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }

    fn complete_through(&mut self, slot: usize) {
        while let Some(front) = self.in_flight.pop_front() {
            self.slots[front].fence_signaled = true;
            if front == slot {
                break;
            }
        }
    }

    /// Change the simulated surface size reported by `surface_extent`.
    pub fn set_extent(&mut self, extent: (u32, u32)) {
        self.extent = extent;
    }

    /// Make the next acquire report a stale target.
    pub fn inject_stale_acquire(&mut self) {
        self.forced_stale_acquires += 1;
    }

    /// Make the next present report a stale target.
    pub fn inject_stale_present(&mut self) {
        self.forced_stale_presents += 1;
    }

    /// Frames currently submitted but not fence-signaled.
    pub fn frames_in_flight_now(&self) -> usize {
        self.in_flight.len()
    }

    /// High-water mark of concurrently in-flight frames.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight
    }

    /// Whether the slot's completion fence is signaled.
    pub fn fence_signaled(&self, slot: usize) -> bool {
        self.slots[slot].fence_signaled
    }

    /// Draw commands of the most recent submission.
    pub fn last_submission(&self) -> &[DrawCommand] {
        &self.last_submission
    }

    /// Total number of submissions so far.
    pub fn submission_count(&self) -> u64 {
        self.submission_count
    }

    /// Camera uniform bytes last written for `slot`.
    pub fn camera_uniform(&self, slot: usize) -> &[u8] {
        &self.slots[slot].camera_uniform
    }

    /// Lighting uniform bytes last written for `slot`.
    pub fn lighting_uniform(&self, slot: usize) -> &[u8] {
        &self.slots[slot].lighting_uniform
    }

    /// Number of binding sets currently built.
    pub fn binding_set_count(&self) -> usize {
        self.binding_sets
    }

    /// How many times the binding sets were rebuilt.
    pub fn binding_rebuild_count(&self) -> u32 {
        self.binding_rebuilds
    }

    /// How many times the surface was recreated.
    pub fn surface_rebuild_count(&self) -> u32 {
        self.surface_rebuilds
    }

    /// Number of live (created, not destroyed) buffers.
    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.len()
    }

    /// Number of live (created, not destroyed) images.
    pub fn live_image_count(&self) -> usize {
        self.live_images.len()
    }
}

impl GpuBackend for HeadlessGpu {
    fn frames_in_flight(&self) -> usize {
        self.slots.len()
    }

    fn upload_geometry(&mut self, mesh: &DecodedMesh) -> GpuResult<GeometryBuffers> {
        let vertex_buffer = BufferId(self.next_id());
        let index_buffer = BufferId(self.next_id());
        self.live_buffers.insert(vertex_buffer);
        self.live_buffers.insert(index_buffer);
        debug!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "Uploaded geometry"
        );
        Ok(GeometryBuffers {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        })
    }

    fn destroy_geometry(&mut self, buffers: &GeometryBuffers) {
        self.live_buffers.remove(&buffers.vertex_buffer);
        self.live_buffers.remove(&buffers.index_buffer);
    }

    fn upload_texture(&mut self, image: &DecodedImage) -> GpuResult<TextureImages> {
        let expected =
            image.width as usize * image.height as usize * image.channels as usize;
        if image.pixels.len() != expected {
            return Err(GpuError::ObjectCreation(format!(
                "texture pixel data is {} bytes, expected {}",
                image.pixels.len(),
                expected
            )));
        }

        let images = TextureImages {
            image: ImageId(self.next_id()),
            view: ImageViewId(self.next_id()),
            sampler: SamplerId(self.next_id()),
        };
        self.live_images.insert(images.image);
        self.live_views.insert(images.view);
        self.live_samplers.insert(images.sampler);
        debug!(width = image.width, height = image.height, "Uploaded texture");
        Ok(images)
    }

    fn destroy_texture(&mut self, images: &TextureImages) {
        // Reverse acquisition order: sampler, view, image.
        self.live_samplers.remove(&images.sampler);
        self.live_views.remove(&images.view);
        self.live_images.remove(&images.image);
    }

    fn rebuild_binding_sets(&mut self, frame_count: usize, resource_count: usize) -> GpuResult<()> {
        self.binding_sets = frame_count * resource_count;
        self.binding_rebuilds += 1;
        debug!(count = self.binding_sets, "Rebuilt binding sets");
        Ok(())
    }

    fn wait_fence(&mut self, slot: usize) -> GpuResult<()> {
        self.check_slot(slot)?;
        if self.slots[slot].fence_signaled {
            return Ok(());
        }
        if !self.in_flight.contains(&slot) {
            return Err(GpuError::Device(format!(
                "wait on slot {slot} fence that no submission will signal"
            )));
        }
        self.complete_through(slot);
        Ok(())
    }

    fn reset_fence(&mut self, slot: usize) -> GpuResult<()> {
        self.check_slot(slot)?;
        self.slots[slot].fence_signaled = false;
        Ok(())
    }

    fn acquire_target(&mut self, slot: usize) -> GpuResult<AcquireOutcome> {
        self.check_slot(slot)?;
        if self.forced_stale_acquires > 0 {
            self.forced_stale_acquires -= 1;
            debug!("Acquire reported stale target");
            return Ok(AcquireOutcome::Stale);
        }
        self.slots[slot].acquire_signaled = true;
        let target = self.next_target;
        self.next_target = (self.next_target + 1) % TARGET_COUNT;
        Ok(AcquireOutcome::Acquired(target))
    }

    fn begin_recording(&mut self, slot: usize) -> GpuResult<()> {
        self.check_slot(slot)?;
        self.slots[slot].recording.clear();
        Ok(())
    }

    fn record_draw(&mut self, slot: usize, draw: DrawCommand) {
        debug_assert!(slot < self.slots.len());
        self.slots[slot].recording.push(draw);
    }

    fn write_camera_uniform(&mut self, slot: usize, bytes: &[u8]) {
        debug_assert!(slot < self.slots.len());
        self.slots[slot].camera_uniform.clear();
        self.slots[slot].camera_uniform.extend_from_slice(bytes);
    }

    fn write_lighting_uniform(&mut self, slot: usize, bytes: &[u8]) {
        debug_assert!(slot < self.slots.len());
        self.slots[slot].lighting_uniform.clear();
        self.slots[slot].lighting_uniform.extend_from_slice(bytes);
    }

    fn submit(&mut self, slot: usize) -> GpuResult<()> {
        self.check_slot(slot)?;
        if self.slots[slot].fence_signaled {
            return Err(GpuError::InvalidSubmission(format!(
                "slot {slot} fence was not reset before submit"
            )));
        }
        if !self.slots[slot].acquire_signaled {
            return Err(GpuError::InvalidSubmission(format!(
                "slot {slot} submitted without an acquired target"
            )));
        }

        self.slots[slot].acquire_signaled = false;
        self.slots[slot].render_finished = true;
        self.in_flight.push_back(slot);
        self.peak_in_flight = self.peak_in_flight.max(self.in_flight.len());

        self.last_submission = self.slots[slot].recording.clone();
        self.submission_count += 1;
        Ok(())
    }

    fn present(&mut self, slot: usize, target: u32) -> GpuResult<PresentOutcome> {
        self.check_slot(slot)?;
        debug_assert!(target < TARGET_COUNT);
        if !self.slots[slot].render_finished {
            return Err(GpuError::InvalidSubmission(format!(
                "slot {slot} presented before its rendering was submitted"
            )));
        }
        self.slots[slot].render_finished = false;

        if self.forced_stale_presents > 0 {
            self.forced_stale_presents -= 1;
            debug!("Present reported stale target");
            return Ok(PresentOutcome::Stale);
        }
        Ok(PresentOutcome::Presented)
    }

    fn surface_extent(&self) -> (u32, u32) {
        self.extent
    }

    fn recreate_surface(&mut self, extent: (u32, u32)) -> GpuResult<()> {
        // All in-flight work must finish before target-dependent objects
        // go away; sync objects are recreated with fences signaled.
        self.wait_idle()?;
        for slot in &mut self.slots {
            slot.fence_signaled = true;
            slot.acquire_signaled = false;
            slot.render_finished = false;
        }
        self.extent = extent;
        self.next_target = 0;
        self.surface_rebuilds += 1;
        info!(?extent, "Recreated presentation surface");
        Ok(())
    }

    fn wait_idle(&mut self) -> GpuResult<()> {
        while let Some(slot) = self.in_flight.pop_front() {
            self.slots[slot].fence_signaled = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_FRAMES_IN_FLIGHT;
    use glam::Mat4;

    fn drive_one_frame(gpu: &mut HeadlessGpu, slot: usize) {
        gpu.wait_fence(slot).unwrap();
        gpu.reset_fence(slot).unwrap();
        let target = match gpu.acquire_target(slot).unwrap() {
            AcquireOutcome::Acquired(t) => t,
            AcquireOutcome::Stale => panic!("unexpected stale"),
        };
        gpu.begin_recording(slot).unwrap();
        gpu.submit(slot).unwrap();
        assert_eq!(gpu.present(slot, target).unwrap(), PresentOutcome::Presented);
    }

    #[test]
    fn test_in_flight_never_exceeds_slot_count() {
        let mut gpu = HeadlessGpu::new(MAX_FRAMES_IN_FLIGHT, (320, 240));
        for frame in 0..20 {
            drive_one_frame(&mut gpu, frame % MAX_FRAMES_IN_FLIGHT);
        }
        assert!(gpu.peak_in_flight() <= MAX_FRAMES_IN_FLIGHT);
        assert_eq!(gpu.submission_count(), 20);
    }

    #[test]
    fn test_submit_requires_reset_fence() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.acquire_target(0).unwrap();
        assert!(matches!(
            gpu.submit(0),
            Err(GpuError::InvalidSubmission(_))
        ));
    }

    #[test]
    fn test_submit_requires_acquire() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.reset_fence(0).unwrap();
        assert!(matches!(
            gpu.submit(0),
            Err(GpuError::InvalidSubmission(_))
        ));
    }

    #[test]
    fn test_wait_on_unsubmittable_fence_fails() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.reset_fence(0).unwrap();
        assert!(matches!(gpu.wait_fence(0), Err(GpuError::Device(_))));
    }

    #[test]
    fn test_stale_acquire_injection() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.inject_stale_acquire();
        assert_eq!(gpu.acquire_target(0).unwrap(), AcquireOutcome::Stale);
        assert!(matches!(
            gpu.acquire_target(0).unwrap(),
            AcquireOutcome::Acquired(_)
        ));
    }

    #[test]
    fn test_recreate_surface_signals_fences() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.reset_fence(0).unwrap();
        gpu.recreate_surface((640, 480)).unwrap();
        assert!(gpu.fence_signaled(0));
        assert_eq!(gpu.surface_extent(), (640, 480));
        assert_eq!(gpu.surface_rebuild_count(), 1);
    }

    #[test]
    fn test_recording_is_captured_per_submission() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        gpu.wait_fence(0).unwrap();
        gpu.reset_fence(0).unwrap();
        gpu.acquire_target(0).unwrap();
        gpu.begin_recording(0).unwrap();
        gpu.record_draw(
            0,
            DrawCommand {
                mesh: crate::GeometryHandle(3),
                texture: crate::TextureHandle(0),
                vertex_buffer: BufferId(1),
                index_buffer: BufferId(2),
                index_count: 36,
                binding_set: 3,
                world_matrix: Mat4::IDENTITY,
            },
        );
        gpu.submit(0).unwrap();
        assert_eq!(gpu.last_submission().len(), 1);
        assert_eq!(gpu.last_submission()[0].index_count, 36);
    }

    #[test]
    fn test_invalid_slot_is_rejected() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        assert!(matches!(
            gpu.wait_fence(5),
            Err(GpuError::InvalidFrameSlot { slot: 5, frames: 2 })
        ));
    }

    #[test]
    fn test_texture_upload_validates_pixel_size() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        let bad = DecodedImage {
            pixels: vec![0; 3],
            width: 2,
            height: 2,
            channels: 4,
        };
        assert!(matches!(
            gpu.upload_texture(&bad),
            Err(GpuError::ObjectCreation(_))
        ));
    }

    #[test]
    fn test_texture_size_check_does_not_wrap_in_u32() {
        let mut gpu = HeadlessGpu::new(2, (320, 240));
        // 65536 * 65536 * 4 wraps to 0 in u32 arithmetic, which would let
        // an empty pixel buffer pass validation.
        let huge = DecodedImage {
            pixels: Vec::new(),
            width: 65536,
            height: 65536,
            channels: 4,
        };
        assert!(matches!(
            gpu.upload_texture(&huge),
            Err(GpuError::ObjectCreation(_))
        ));
    }

    #[test]
    fn test_headless_gpu_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<HeadlessGpu>();
    }
}
