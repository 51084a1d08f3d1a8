//! Engine settings applied at startup.

/// Startup settings for the runtime.
///
/// Collects everything the engine needs before any device or window work
/// happens: identification strings, the initial drawable size, and the
/// clear color used for the presentation target.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Window title.
    pub window_title: String,
    /// Application name reported to the device backend.
    pub application_name: String,
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Background (clear) color, RGBA in `[0, 1]`.
    pub background_color: [f32; 4],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "Ember".to_string(),
            application_name: "ember-app".to_string(),
            window_width: 1280,
            window_height: 720,
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Settings {
    /// Create settings with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the background clear color.
    pub fn with_background(mut self, color: [f32; 4]) -> Self {
        self.background_color = color;
        self
    }

    /// Aspect ratio of the initial window size.
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}
