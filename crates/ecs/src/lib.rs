//! Fixed-capacity entity-component world.
//!
//! This crate provides the scene-side half of the runtime:
//! - [`Entity`] identifiers and the [`World`] registry
//! - Plain-data component records addressed directly by entity id
//! - Per-entity [`Signature`] bitmasks used as the sole query mechanism
//! - CPU systems (transforms, cameras, lighting) that walk the live list
//!
//! Entities are never deleted; ids are handed out by an ever-incrementing
//! counter and a world holds at most its fixed capacity of live entities.

mod components;
mod entity;
mod signature;
pub mod systems;
mod world;

pub use components::{
    CameraComponent, Component, LightComponent, MeshRendererComponent, TransformComponent,
    VisibilityComponent,
};
pub use entity::Entity;
pub use signature::Signature;
pub use world::{World, MAX_ENTITIES};
