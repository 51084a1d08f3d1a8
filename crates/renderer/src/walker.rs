//! The render walker.
//!
//! One pass over the live-entity list per frame: entities carrying the
//! full drawable signature (transform, mesh renderer, visibility) are
//! resolved against the resource pool and recorded as indexed draws into
//! the current slot's command stream.

use tracing::warn;

use ember_ecs::{MeshRendererComponent, Signature, TransformComponent, VisibilityComponent, World};
use ember_gpu::{DrawCommand, GeometryHandle, GpuBackend, ResourcePool, TextureHandle};

/// Record draws for every visible drawable entity.
///
/// Skips entities that are invisible or fully transparent, and entities
/// whose geometry handle is not live in the pool. Each draw carries the
/// entity's texture handle so the backend can bind the matching image
/// set. The binding set index is `slot * geometry_count + mesh`, matching
/// the per-slot set layout built by
/// [`GpuBackend::rebuild_binding_sets`]. Returns the number of draws
/// recorded.
pub fn record_scene(
    world: &World,
    pool: &ResourcePool,
    backend: &mut dyn GpuBackend,
    slot: usize,
) -> u32 {
    let mut recorded = 0;

    for &entity in world.entities() {
        if !world.signature(entity).contains(Signature::DRAWABLE) {
            continue;
        }

        // The signature guarantees all three components are attached.
        let Some(visibility) = world.get_component::<VisibilityComponent>(entity) else {
            continue;
        };
        if !visibility.visible || visibility.alpha <= 0.0 {
            continue;
        }
        let Some(renderer) = world.get_component::<MeshRendererComponent>(entity) else {
            continue;
        };
        let Some(transform) = world.get_component::<TransformComponent>(entity) else {
            continue;
        };

        let mesh = GeometryHandle(renderer.mesh);
        let vertex_buffer = pool.vertex_buffer(mesh);
        if vertex_buffer.is_null() {
            warn!(entity = entity.id(), mesh = renderer.mesh, "Skipping draw with non-live geometry");
            continue;
        }

        backend.record_draw(
            slot,
            DrawCommand {
                mesh,
                texture: TextureHandle(renderer.texture),
                vertex_buffer,
                index_buffer: pool.index_buffer(mesh),
                index_count: pool.index_count(mesh),
                binding_set: slot as u32 * pool.geometry_count() + renderer.mesh,
                world_matrix: transform.matrix,
            },
        );
        recorded += 1;
    }

    recorded
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_ecs::systems::update_transforms;
    use ember_gpu::{DecodedImage, DecodedMesh, HeadlessGpu, Vertex};
    use glam::Vec3;

    fn mesh(indices: u32) -> DecodedMesh {
        DecodedMesh {
            vertices: vec![Vertex::default(); 3],
            indices: (0..indices).collect(),
        }
    }

    fn image() -> DecodedImage {
        DecodedImage {
            pixels: vec![255; 4],
            width: 1,
            height: 1,
            channels: 4,
        }
    }

    fn drawable(world: &mut World, mesh: u32) -> ember_ecs::Entity {
        let e = world.create_entity();
        world.add_component(e, TransformComponent::default());
        world.add_component(
            e,
            MeshRendererComponent {
                mesh,
                texture: 0,
            },
        );
        world.add_component(e, VisibilityComponent::default());
        e
    }

    #[test]
    fn test_records_only_fully_signed_entities() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        pool.load_geometry(&mut gpu, mesh(6)).unwrap();

        let mut world = World::with_capacity(8);
        drawable(&mut world, 0);

        // Transform only: not drawable.
        let partial = world.create_entity();
        world.add_component(partial, TransformComponent::default());

        update_transforms(&mut world);
        gpu.begin_recording(0).unwrap();
        assert_eq!(record_scene(&world, &pool, &mut gpu, 0), 1);
    }

    #[test]
    fn test_invisible_and_transparent_are_skipped() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        pool.load_geometry(&mut gpu, mesh(6)).unwrap();

        let mut world = World::with_capacity(8);
        let hidden = drawable(&mut world, 0);
        world
            .get_component_mut::<VisibilityComponent>(hidden)
            .unwrap()
            .visible = false;

        let transparent = drawable(&mut world, 0);
        world
            .get_component_mut::<VisibilityComponent>(transparent)
            .unwrap()
            .alpha = 0.0;

        update_transforms(&mut world);
        gpu.begin_recording(0).unwrap();
        assert_eq!(record_scene(&world, &pool, &mut gpu, 0), 0);
    }

    #[test]
    fn test_binding_set_strides_by_slot() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        pool.load_geometry(&mut gpu, mesh(3)).unwrap();
        pool.load_geometry(&mut gpu, mesh(6)).unwrap();

        let mut world = World::with_capacity(8);
        drawable(&mut world, 1);
        update_transforms(&mut world);

        gpu.begin_recording(1).unwrap();
        record_scene(&world, &pool, &mut gpu, 1);
        gpu.reset_fence(1).unwrap();
        gpu.acquire_target(1).unwrap();
        gpu.submit(1).unwrap();

        let draw = gpu.last_submission()[0];
        // slot 1 * geometry_count 2 + mesh 1
        assert_eq!(draw.binding_set, 3);
        assert_eq!(draw.index_count, 6);
    }

    #[test]
    fn test_freed_geometry_is_not_drawn() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        let h = pool.load_geometry(&mut gpu, mesh(3)).unwrap();

        let mut world = World::with_capacity(8);
        drawable(&mut world, h.0);
        update_transforms(&mut world);

        pool.free_geometry(&mut gpu, h);
        gpu.begin_recording(0).unwrap();
        assert_eq!(record_scene(&world, &pool, &mut gpu, 0), 0);
    }

    #[test]
    fn test_texture_handle_flows_into_draw() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        pool.load_geometry(&mut gpu, mesh(3)).unwrap();
        pool.load_texture(&mut gpu, image()).unwrap();
        let tex = pool.load_texture(&mut gpu, image()).unwrap();

        let mut world = World::with_capacity(8);
        let e = drawable(&mut world, 0);
        world
            .get_component_mut::<MeshRendererComponent>(e)
            .unwrap()
            .texture = tex.0;
        update_transforms(&mut world);

        gpu.begin_recording(0).unwrap();
        gpu.reset_fence(0).unwrap();
        gpu.acquire_target(0).unwrap();
        record_scene(&world, &pool, &mut gpu, 0);
        gpu.submit(0).unwrap();

        let draw = gpu.last_submission()[0];
        assert_eq!(draw.texture, tex);
        assert!(pool.texture(draw.texture).is_some());
    }

    #[test]
    fn test_world_matrix_flows_into_draw() {
        let mut gpu = HeadlessGpu::new(2, (640, 480));
        let mut pool = ResourcePool::new();
        pool.load_geometry(&mut gpu, mesh(3)).unwrap();

        let mut world = World::with_capacity(8);
        let e = drawable(&mut world, 0);
        world.set_position(e, Vec3::new(4.0, 0.0, 0.0));
        update_transforms(&mut world);

        gpu.begin_recording(0).unwrap();
        gpu.reset_fence(0).unwrap();
        gpu.acquire_target(0).unwrap();
        record_scene(&world, &pool, &mut gpu, 0);
        gpu.submit(0).unwrap();

        let draw = gpu.last_submission()[0];
        assert_eq!(draw.world_matrix.w_axis.x, 4.0);
    }
}
