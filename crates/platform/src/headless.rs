//! Scriptable platform for tests.

use crate::input::{InputState, KeyCode};
use crate::Platform;

/// [`Platform`] implementation without a window.
///
/// Tests set the extent and feed input events directly; the runtime core
/// behaves exactly as it would against a real window.
pub struct HeadlessPlatform {
    extent: (u32, u32),
    input: InputState,
    exit_requested: bool,
}

impl HeadlessPlatform {
    pub fn new(extent: (u32, u32)) -> Self {
        Self {
            extent,
            input: InputState::new(),
            exit_requested: false,
        }
    }

    /// Simulate a window resize.
    pub fn set_extent(&mut self, extent: (u32, u32)) {
        self.extent = extent;
    }

    /// Press a key for subsequent ticks.
    pub fn press_key(&mut self, key: KeyCode) {
        self.input.on_key_pressed(key);
    }

    /// Release a previously pressed key.
    pub fn release_key(&mut self, key: KeyCode) {
        self.input.on_key_released(key);
    }

    /// Feed a cursor move.
    pub fn move_cursor(&mut self, x: f32, y: f32) {
        self.input.on_cursor_moved(x, y);
    }

    /// Feed a scroll step.
    pub fn scroll(&mut self, delta: f32) {
        self.input.on_scroll(delta);
    }
}

impl Platform for HeadlessPlatform {
    fn drawable_extent(&self) -> (u32, u32) {
        self.extent
    }

    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}
