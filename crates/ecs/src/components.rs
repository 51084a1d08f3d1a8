//! Plain-data component records.
//!
//! Every component is a fixed-size `Copy + Default` record stored in a
//! per-kind slot array inside the [`World`]. The [`Component`] trait ties a
//! record type to its signature bit and its slot array; it is implemented
//! for the closed set of kinds below and is not meant to be implemented
//! outside this crate.

use glam::{Mat4, Vec3};

use crate::signature::Signature;
use crate::world::World;

/// A component kind storable in the [`World`].
///
/// `SIGNATURE` is the single bit identifying the kind; the slot accessors
/// select the kind's direct-indexed array out of the world.
pub trait Component: Copy + Default + 'static {
    /// The signature bit for this component kind.
    const SIGNATURE: Signature;

    /// The kind's slot array.
    fn slots(world: &World) -> &[Self];

    /// The kind's slot array, mutably.
    fn slots_mut(world: &mut World) -> &mut [Self];
}

/// Position, rotation and scale of a scene object.
///
/// `matrix` caches the composed world matrix; it is recomputed by the
/// transform system whenever `dirty` is set and must not be read while
/// dirty.
#[derive(Clone, Copy, Debug)]
pub struct TransformComponent {
    /// Position in world space.
    pub position: Vec3,
    /// Euler rotation in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale factor.
    pub scale: Vec3,
    /// Set whenever position/rotation/scale change; cleared by the
    /// transform system after `matrix` is recomputed.
    pub dirty: bool,
    /// Cached world matrix: translation × (rotation × scale).
    pub matrix: Mat4,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            dirty: true,
            matrix: Mat4::IDENTITY,
        }
    }
}

impl TransformComponent {
    /// Create a transform at the given position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Reference to GPU-resident geometry and texture resources.
///
/// The ids are resource-pool handles; the component itself stays plain
/// data and never touches the pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshRendererComponent {
    /// Geometry handle issued by the resource pool.
    pub mesh: u32,
    /// Texture handle issued by the resource pool.
    pub texture: u32,
}

/// Fly camera with derived basis vectors and cached matrices.
#[derive(Clone, Copy, Debug)]
pub struct CameraComponent {
    /// Camera position in world space.
    pub position: Vec3,
    /// Forward direction, derived from yaw/pitch.
    pub front: Vec3,
    /// Up direction, derived from `front` and `world_up`.
    pub up: Vec3,
    /// Right direction, derived from `front` and `world_up`.
    pub right: Vec3,
    /// World up reference used to derive the basis.
    pub world_up: Vec3,
    /// Yaw angle in degrees.
    pub yaw: f32,
    /// Pitch angle in degrees, clamped to ±89.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Movement speed in units per second.
    pub movement_speed: f32,
    /// Mouse-look sensitivity in degrees per pixel.
    pub mouse_sensitivity: f32,
    /// Cached view matrix; valid while `dirty` is false.
    pub view: Mat4,
    /// Cached projection matrix; valid while `dirty` is false.
    pub projection: Mat4,
    /// Only active cameras are updated and rendered from.
    pub active: bool,
    /// Set when position/orientation/projection inputs change.
    pub dirty: bool,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            movement_speed: 5.0,
            mouse_sensitivity: 0.1,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            active: true,
            dirty: true,
        }
    }
}

/// Whether an entity is drawn, and at what opacity.
///
/// Entities with `visible == false` or `alpha <= 0` are skipped by the
/// render walker.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityComponent {
    /// Draw the entity at all.
    pub visible: bool,
    /// Opacity in `[0, 1]`; non-positive values skip the draw.
    pub alpha: f32,
}

impl Default for VisibilityComponent {
    fn default() -> Self {
        Self {
            visible: true,
            alpha: 1.0,
        }
    }
}

/// A point light; its position comes from the entity's transform.
#[derive(Clone, Copy, Debug)]
pub struct LightComponent {
    /// Light color.
    pub color: Vec3,
    /// Light intensity multiplier.
    pub intensity: f32,
    /// Disabled lights are ignored by the lighting gather.
    pub enabled: bool,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            enabled: true,
        }
    }
}

macro_rules! impl_component {
    ($ty:ty, $bit:ident, $field:ident) => {
        impl Component for $ty {
            const SIGNATURE: Signature = Signature::$bit;

            #[inline]
            fn slots(world: &World) -> &[Self] {
                &world.$field
            }

            #[inline]
            fn slots_mut(world: &mut World) -> &mut [Self] {
                &mut world.$field
            }
        }
    };
}

impl_component!(TransformComponent, TRANSFORM, transforms);
impl_component!(MeshRendererComponent, MESH_RENDERER, mesh_renderers);
impl_component!(CameraComponent, CAMERA, cameras);
impl_component!(VisibilityComponent, VISIBILITY, visibilities);
impl_component!(LightComponent, LIGHT, lights);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default_is_identity_inputs() {
        let t = TransformComponent::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert!(t.dirty);
    }

    #[test]
    fn test_visibility_default_visible() {
        let v = VisibilityComponent::default();
        assert!(v.visible);
        assert_eq!(v.alpha, 1.0);
    }
}
