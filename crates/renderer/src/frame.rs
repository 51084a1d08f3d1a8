//! Frame synchronization and the begin/end tick state machine.
//!
//! The pipeline implements the frames-in-flight pattern: while the GPU
//! renders frame N, the CPU prepares frame N+1. Each frame slot has its
//! own synchronization primitives and uniform buffers inside the backend;
//! the pipeline only tracks which slot is current and drives the backend
//! in the right order:
//!
//! 1. Wait on the slot's completion fence (CPU backpressure)
//! 2. Reset the fence
//! 3. Acquire a presentation target (signals the acquire semaphore)
//! 4. Record commands and write uniforms
//! 5. Submit (waits acquire, signals render-finished and the fence)
//! 6. Present (waits render-finished)
//! 7. Advance to the next slot, modulo the slot count
//!
//! Everything per-frame is addressed by the slot index alone; the target
//! index from acquire is carried only into present.

use tracing::debug;

use ember_gpu::{AcquireOutcome, GpuBackend, GpuResult, PresentOutcome};

/// Tracks the current frame slot and sequences one frame.
///
/// A begun frame must be finished (or abandoned via a stale outcome)
/// before the next begin; the pipeline itself holds no device state.
pub struct FramePipeline {
    frames: usize,
    slot: usize,
}

impl FramePipeline {
    /// Create a pipeline cycling over `frames` slots.
    pub fn new(frames: usize) -> Self {
        debug_assert!(frames >= 1);
        Self { frames, slot: 0 }
    }

    /// The current frame slot index.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Number of frame slots.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Begin a frame on the current slot.
    ///
    /// Waits for the slot's previous submission, resets its fence,
    /// acquires a target and opens command recording. Returns the target
    /// index, or `None` when the target set is stale; in that case nothing
    /// was recorded and the caller must rebuild before the next begin
    /// (rebuilding leaves all fences signaled, so the reset here cannot
    /// deadlock a later wait).
    pub fn begin(&mut self, backend: &mut dyn GpuBackend) -> GpuResult<Option<u32>> {
        backend.wait_fence(self.slot)?;
        backend.reset_fence(self.slot)?;

        let target = match backend.acquire_target(self.slot)? {
            AcquireOutcome::Acquired(target) => target,
            AcquireOutcome::Stale => {
                debug!(slot = self.slot, "Stale target during acquire");
                return Ok(None);
            }
        };

        backend.begin_recording(self.slot)?;
        Ok(Some(target))
    }

    /// Submit and present the frame begun on the current slot, then
    /// advance to the next slot.
    ///
    /// Returns `true` when presentation reported a stale target and the
    /// caller must rebuild.
    pub fn finish(&mut self, backend: &mut dyn GpuBackend, target: u32) -> GpuResult<bool> {
        backend.submit(self.slot)?;
        let outcome = backend.present(self.slot, target)?;
        self.slot = (self.slot + 1) % self.frames;
        Ok(outcome == PresentOutcome::Stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_gpu::{HeadlessGpu, MAX_FRAMES_IN_FLIGHT};

    #[test]
    fn test_slots_cycle_modulo_frame_count() {
        let mut gpu = HeadlessGpu::new(MAX_FRAMES_IN_FLIGHT, (640, 480));
        let mut pipeline = FramePipeline::new(MAX_FRAMES_IN_FLIGHT);

        for i in 0..6 {
            assert_eq!(pipeline.slot(), i % MAX_FRAMES_IN_FLIGHT);
            let target = pipeline.begin(&mut gpu).unwrap().unwrap();
            assert!(!pipeline.finish(&mut gpu, target).unwrap());
        }
    }

    #[test]
    fn test_run_ahead_is_bounded_by_slot_count() {
        let mut gpu = HeadlessGpu::new(MAX_FRAMES_IN_FLIGHT, (640, 480));
        let mut pipeline = FramePipeline::new(MAX_FRAMES_IN_FLIGHT);

        for _ in 0..32 {
            let target = pipeline.begin(&mut gpu).unwrap().unwrap();
            pipeline.finish(&mut gpu, target).unwrap();
        }
        assert!(gpu.peak_in_flight() <= MAX_FRAMES_IN_FLIGHT);
    }

    #[test]
    fn test_stale_acquire_skips_frame_without_submitting() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pipeline = FramePipeline::new(2);

        gpu.inject_stale_acquire();
        assert!(pipeline.begin(&mut gpu).unwrap().is_none());
        assert_eq!(gpu.submission_count(), 0);
        // The slot does not advance on a skipped frame.
        assert_eq!(pipeline.slot(), 0);

        // After the rebuild the same slot begins cleanly.
        gpu.recreate_surface((640, 480)).unwrap();
        let target = pipeline.begin(&mut gpu).unwrap().unwrap();
        pipeline.finish(&mut gpu, target).unwrap();
        assert_eq!(pipeline.slot(), 1);
    }

    #[test]
    fn test_stale_present_is_reported() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pipeline = FramePipeline::new(2);

        gpu.inject_stale_present();
        let target = pipeline.begin(&mut gpu).unwrap().unwrap();
        assert!(pipeline.finish(&mut gpu, target).unwrap());
        // The frame was still submitted; only the caller rebuilds after.
        assert_eq!(gpu.submission_count(), 1);
    }
}
