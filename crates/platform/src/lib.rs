//! Platform layer: windowing and input.
//!
//! The runtime core talks to the platform through the [`Platform`] trait,
//! which exposes the drawable extent, the current input state and the exit
//! flag. [`WindowPlatform`] backs it with a winit window;
//! [`HeadlessPlatform`] is a scriptable stand-in for tests.

mod headless;
mod input;
mod window;

pub use headless::HeadlessPlatform;
pub use input::{InputState, KeyCode, MouseButton};
pub use window::{Window, WindowPlatform};

/// What the runtime core needs from the platform each tick.
pub trait Platform {
    /// Current drawable surface size in pixels. A zero extent means the
    /// window is minimized and the tick should be skipped.
    fn drawable_extent(&self) -> (u32, u32);

    /// Input state accumulated since the last tick.
    fn input(&self) -> &InputState;

    /// Mutable input state, for clearing per-tick accumulators.
    fn input_mut(&mut self) -> &mut InputState;

    /// Whether the user asked to close the application.
    fn exit_requested(&self) -> bool;

    /// Ask the application to close.
    fn request_exit(&mut self);
}
