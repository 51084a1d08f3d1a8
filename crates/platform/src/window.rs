//! Window management using winit.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window as WinitWindow, WindowAttributes};

use ember_core::{Error, Result, Settings};

use crate::input::InputState;
use crate::Platform;

/// A winit window with cached dimensions.
pub struct Window {
    window: Arc<WinitWindow>,
    width: u32,
    height: u32,
}

impl Window {
    /// Create a window from the application settings.
    pub fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(&settings.window_title)
            .with_inner_size(PhysicalSize::new(
                settings.window_width,
                settings.window_height,
            ))
            .with_resizable(true);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| Error::Window(e.to_string()))?;

        tracing::info!(
            width = settings.window_width,
            height = settings.window_height,
            "Window created"
        );

        Ok(Self {
            window: Arc::new(window),
            width: settings.window_width,
            height: settings.window_height,
        })
    }

    pub fn inner(&self) -> &WinitWindow {
        &self.window
    }

    /// Update the cached dimensions from a resize event.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        tracing::debug!(width, height, "Window resized");
    }

    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// [`Platform`] implementation backed by a winit window.
///
/// The application handler forwards each [`WindowEvent`] to
/// [`WindowPlatform::on_window_event`]; the runtime core only ever sees
/// the [`Platform`] trait.
pub struct WindowPlatform {
    window: Window,
    input: InputState,
    exit_requested: bool,
}

impl WindowPlatform {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            input: InputState::new(),
            exit_requested: false,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Translate a winit event into input and window state.
    pub fn on_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
            }
            WindowEvent::Resized(size) => {
                self.window.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.on_key_pressed(code),
                        ElementState::Released => self.input.on_key_released(code),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.input.on_mouse_pressed((*button).into()),
                ElementState::Released => self.input.on_mouse_released((*button).into()),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .on_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.input.on_scroll(y);
            }
            _ => {}
        }
    }
}

impl Platform for WindowPlatform {
    fn drawable_extent(&self) -> (u32, u32) {
        self.window.extent()
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
