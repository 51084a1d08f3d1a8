//! The runtime core: frame pipeline, render walker and engine facade.
//!
//! [`Engine`] ties the layers together: the entity world from `ember-ecs`,
//! the resource pool and device boundary from `ember-gpu`, asset importing
//! from `ember-assets` and the platform trait from `ember-platform`. One
//! call pair, [`Engine::begin_frame`] / [`Engine::end_frame`], runs a full
//! tick: input, CPU systems, uniform writes, draw recording, submission
//! and presentation.

pub mod engine;
pub mod error;
pub mod frame;
pub mod ubo;
pub mod walker;

pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use frame::FramePipeline;
pub use ubo::{CameraUbo, LightingUbo};

pub use ember_gpu::MAX_FRAMES_IN_FLIGHT;
