//! The entity registry and component store.

use glam::Vec3;
use tracing::debug;

use crate::components::{
    CameraComponent, Component, LightComponent, MeshRendererComponent, TransformComponent,
    VisibilityComponent,
};
use crate::entity::Entity;
use crate::signature::Signature;

/// Default maximum number of live entities in a world.
pub const MAX_ENTITIES: u32 = 1024;

/// Fixed-capacity world owning the entity registry and all component slots.
///
/// Component storage is one direct-indexed array per kind, sized at
/// construction to `capacity + 1` slots so a raw entity id addresses its
/// slot without translation (slot 0 backs the reserved invalid id and is
/// never used). This trades memory for O(1) component access with no
/// indirection.
///
/// Entity ids are issued by an ever-incrementing counter starting at 1 and
/// are never reused; there is no entity deletion. Creation past capacity
/// fails by returning [`Entity::NONE`].
pub struct World {
    /// Live entities in creation order.
    pub(crate) entities: Vec<Entity>,
    /// Per-entity capability bitmask, indexed by entity id.
    pub(crate) signatures: Box<[Signature]>,
    pub(crate) transforms: Box<[TransformComponent]>,
    pub(crate) mesh_renderers: Box<[MeshRendererComponent]>,
    pub(crate) cameras: Box<[CameraComponent]>,
    pub(crate) visibilities: Box<[VisibilityComponent]>,
    pub(crate) lights: Box<[LightComponent]>,
    capacity: u32,
    next_id: u32,
}

fn slots<T: Default + Clone>(capacity: u32) -> Box<[T]> {
    vec![T::default(); capacity as usize + 1].into_boxed_slice()
}

impl World {
    /// Create a world with the default capacity of [`MAX_ENTITIES`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    /// Create a world holding at most `capacity` live entities.
    ///
    /// All per-kind component arrays are allocated up front at full
    /// capacity.
    pub fn with_capacity(capacity: u32) -> Self {
        debug!(capacity, "Creating world");
        Self {
            entities: Vec::with_capacity(capacity as usize),
            signatures: slots(capacity),
            transforms: slots(capacity),
            mesh_renderers: slots(capacity),
            cameras: slots(capacity),
            visibilities: slots(capacity),
            lights: slots(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Maximum number of live entities.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of live entities.
    #[inline]
    pub fn live_count(&self) -> u32 {
        self.entities.len() as u32
    }

    /// The live entities in creation order.
    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Create a new entity with an empty signature.
    ///
    /// Returns [`Entity::NONE`] if the world is at capacity; the live
    /// count is unchanged in that case.
    pub fn create_entity(&mut self) -> Entity {
        if self.entities.len() >= self.capacity as usize {
            debug!(capacity = self.capacity, "Entity capacity exhausted");
            return Entity::NONE;
        }

        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.entities.push(entity);
        self.signatures[entity.index()] = Signature::empty();
        entity
    }

    /// Whether `entity` is live in this world.
    ///
    /// The lookup walks the live list, matching the reference behavior;
    /// the list is bounded by the world capacity.
    pub fn entity_exists(&self, entity: Entity) -> bool {
        if entity.is_none() || entity.id() >= self.next_id {
            return false;
        }
        self.entities.contains(&entity)
    }

    /// The signature of `entity`, or empty for an unknown id.
    #[inline]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures
            .get(entity.index())
            .copied()
            .unwrap_or_default()
    }

    /// Attach (or overwrite) a component on `entity`.
    ///
    /// Silently ignored if the entity does not exist. Overwrites any prior
    /// value for the kind without requiring removal first.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) {
        if !self.entity_exists(entity) {
            return;
        }
        C::slots_mut(self)[entity.index()] = value;
        self.signatures[entity.index()] |= C::SIGNATURE;
    }

    /// Whether `entity` has a component of kind `C` attached.
    #[inline]
    pub fn has_component<C: Component>(&self, entity: Entity) -> bool {
        self.signature(entity).contains(C::SIGNATURE)
    }

    /// Read `entity`'s component of kind `C`.
    ///
    /// Returns `None` when the signature bit for the kind is unset; a slot
    /// is only meaningful while its bit is set.
    pub fn get_component<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.has_component::<C>(entity) {
            return None;
        }
        C::slots(self).get(entity.index())
    }

    /// Mutable access to `entity`'s component of kind `C`.
    ///
    /// This is the only path by which systems mutate component data; the
    /// reference lifetime is tied to the world borrow.
    pub fn get_component_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.has_component::<C>(entity) {
            return None;
        }
        C::slots_mut(self).get_mut(entity.index())
    }

    /// Set the position of `entity`'s transform and mark it dirty.
    ///
    /// Silent no-op without a transform component.
    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        if let Some(transform) = self.get_component_mut::<TransformComponent>(entity) {
            transform.position = position;
            transform.dirty = true;
        }
    }

    /// Set the Euler rotation (radians, XYZ order) of `entity`'s transform.
    pub fn set_rotation(&mut self, entity: Entity, rotation: Vec3) {
        if let Some(transform) = self.get_component_mut::<TransformComponent>(entity) {
            transform.rotation = rotation;
            transform.dirty = true;
        }
    }

    /// Set the scale of `entity`'s transform and mark it dirty.
    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) {
        if let Some(transform) = self.get_component_mut::<TransformComponent>(entity) {
            transform.scale = scale;
            transform.dirty = true;
        }
    }

    /// Move `entity` by `delta` and mark its transform dirty.
    pub fn translate(&mut self, entity: Entity, delta: Vec3) {
        if let Some(transform) = self.get_component_mut::<TransformComponent>(entity) {
            transform.position += delta;
            transform.dirty = true;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
