//! CPU-side systems walking the live-entity list.
//!
//! Every system is a free function over the [`World`] following the same
//! pattern: iterate the live list, test the required signature bits with a
//! single bitwise AND, and skip non-matching entities. There is no separate
//! query or cache structure.

use glam::{EulerRot, Mat4, Vec3};

use crate::components::{CameraComponent, LightComponent, TransformComponent};
use crate::entity::Entity;
use crate::signature::Signature;
use crate::world::World;

/// Recompute the world matrix of every dirty transform.
///
/// The matrix composes as translation × (rotation × scale) with the
/// rotation built from Euler angles in XYZ order. The dirty flag is
/// cleared after the recompute.
pub fn update_transforms(world: &mut World) {
    for i in 0..world.entities.len() {
        let entity = world.entities[i];
        if !world.signatures[entity.index()].contains(Signature::TRANSFORM) {
            continue;
        }

        let transform = &mut world.transforms[entity.index()];
        if !transform.dirty {
            continue;
        }

        let translation = Mat4::from_translation(transform.position);
        let rotation = Mat4::from_euler(
            EulerRot::XYZ,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
        );
        let scale = Mat4::from_scale(transform.scale);

        transform.matrix = translation * (rotation * scale);
        transform.dirty = false;
    }
}

/// Recompute view/projection matrices of active, dirty cameras.
///
/// The projection uses the given surface aspect ratio and flips Y for the
/// Vulkan clip-space convention.
pub fn update_cameras(world: &mut World, aspect: f32) {
    for i in 0..world.entities.len() {
        let entity = world.entities[i];
        if !world.signatures[entity.index()].contains(Signature::CAMERA) {
            continue;
        }

        let camera = &mut world.cameras[entity.index()];
        if !camera.active || !camera.dirty {
            continue;
        }

        camera.view = Mat4::look_at_rh(camera.position, camera.position + camera.front, camera.up);

        let mut projection =
            Mat4::perspective_rh(camera.fov.to_radians(), aspect, camera.near, camera.far);
        projection.y_axis.y *= -1.0;
        camera.projection = projection;

        camera.dirty = false;
    }
}

/// Mark every camera dirty so matrices are recomputed next update.
///
/// Called after the presentation target is rebuilt so projections pick up
/// the new dimensions.
pub fn mark_cameras_dirty(world: &mut World) {
    for i in 0..world.entities.len() {
        let entity = world.entities[i];
        if world.signatures[entity.index()].contains(Signature::CAMERA) {
            world.cameras[entity.index()].dirty = true;
        }
    }
}

/// First live entity carrying an active camera, if any.
pub fn active_camera(world: &World) -> Option<Entity> {
    world
        .entities()
        .iter()
        .copied()
        .find(|&e| matches!(world.get_component::<CameraComponent>(e), Some(c) if c.active))
}

/// Rederive a camera's front/right/up basis from its yaw and pitch.
pub fn update_camera_vectors(camera: &mut CameraComponent) {
    let (yaw, pitch) = (camera.yaw.to_radians(), camera.pitch.to_radians());
    let front = Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    );
    camera.front = front.normalize();
    camera.right = camera.front.cross(camera.world_up).normalize();
    camera.up = camera.right.cross(camera.front).normalize();
}

/// Move a camera along `direction`, scaled by its speed and `delta_time`.
///
/// Silent no-op without a camera component.
pub fn move_camera(world: &mut World, entity: Entity, direction: Vec3, delta_time: f32) {
    if let Some(camera) = world.get_component_mut::<CameraComponent>(entity) {
        if direction.length_squared() > 0.0 {
            camera.position += direction.normalize() * camera.movement_speed * delta_time;
            camera.dirty = true;
        }
    }
}

/// Apply a mouse-look delta to a camera, clamping pitch to ±89 degrees.
pub fn rotate_camera(world: &mut World, entity: Entity, yaw_delta: f32, pitch_delta: f32) {
    if let Some(camera) = world.get_component_mut::<CameraComponent>(entity) {
        camera.yaw += yaw_delta * camera.mouse_sensitivity;
        camera.pitch = (camera.pitch + pitch_delta * camera.mouse_sensitivity).clamp(-89.0, 89.0);
        update_camera_vectors(camera);
        camera.dirty = true;
    }
}

/// Scene lighting state gathered from the world.
#[derive(Clone, Copy, Debug, Default)]
pub struct LightingInfo {
    /// World-space position of the light (from its transform).
    pub position: Vec3,
    /// Light color.
    pub color: Vec3,
    /// Light intensity multiplier.
    pub intensity: f32,
}

/// Gather the first enabled light that also carries a transform.
///
/// Returns `None` when the scene has no usable light; callers fall back to
/// ambient-only lighting.
pub fn gather_lighting(world: &World) -> Option<LightingInfo> {
    let required = Signature::LIGHT | Signature::TRANSFORM;

    for &entity in world.entities() {
        if !world.signature(entity).contains(required) {
            continue;
        }

        let light = world.get_component::<LightComponent>(entity)?;
        if !light.enabled {
            continue;
        }
        let transform = world.get_component::<TransformComponent>(entity)?;

        return Some(LightingInfo {
            position: transform.position,
            color: light.color,
            intensity: light.intensity,
        });
    }
    None
}
