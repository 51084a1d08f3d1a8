//! End-to-end scene tests driving the engine against the headless
//! backend and platform.

use std::thread::sleep;
use std::time::Duration;

use glam::{Mat4, Vec3};

use ember_assets::{unit_cube, unit_quad};
use ember_core::Settings;
use ember_ecs::{
    CameraComponent, LightComponent, MeshRendererComponent, TransformComponent,
    VisibilityComponent,
};
use ember_gpu::{GeometryHandle, GpuBackend, HeadlessGpu, MAX_FRAMES_IN_FLIGHT};
use ember_platform::{HeadlessPlatform, KeyCode, Platform};
use ember_renderer::{CameraUbo, Engine, LightingUbo};

const EXTENT: (u32, u32) = (640, 480);

fn engine() -> Engine<HeadlessGpu> {
    Engine::new(
        HeadlessGpu::new(MAX_FRAMES_IN_FLIGHT, EXTENT),
        Settings::new().with_size(EXTENT.0, EXTENT.1),
    )
}

fn spawn_camera(engine: &mut Engine<HeadlessGpu>) -> ember_ecs::Entity {
    let e = engine.create_entity();
    engine.add_component(e, CameraComponent::default());
    e
}

fn spawn_drawable(engine: &mut Engine<HeadlessGpu>, mesh: GeometryHandle) -> ember_ecs::Entity {
    let e = engine.create_entity();
    engine.add_component(e, TransformComponent::default());
    engine.add_component(
        e,
        MeshRendererComponent {
            mesh: mesh.0,
            texture: 0,
        },
    );
    engine.add_component(e, VisibilityComponent::default());
    e
}

fn tick(engine: &mut Engine<HeadlessGpu>, platform: &mut HeadlessPlatform) -> bool {
    let drew = engine.begin_frame(platform).unwrap();
    engine.end_frame(platform).unwrap();
    drew
}

#[test]
fn test_basic_scene_records_one_draw() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let cube = engine.load_geometry_data(unit_cube()).unwrap();
    spawn_drawable(&mut engine, cube);
    spawn_camera(&mut engine);

    assert!(tick(&mut engine, &mut platform));

    let draws = engine.backend().last_submission().to_vec();
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mesh, cube);
    assert_eq!(draws[0].index_count, 36);
    assert_eq!(draws[0].world_matrix, Mat4::IDENTITY);
}

#[test]
fn test_invisible_entities_are_not_drawn() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    let hidden = spawn_drawable(&mut engine, quad);
    engine
        .world_mut()
        .get_component_mut::<VisibilityComponent>(hidden)
        .unwrap()
        .visible = false;
    spawn_camera(&mut engine);

    assert!(tick(&mut engine, &mut platform));
    assert_eq!(engine.backend().last_submission().len(), 1);
}

#[test]
fn test_run_ahead_is_bounded() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    spawn_camera(&mut engine);

    for _ in 0..20 {
        assert!(tick(&mut engine, &mut platform));
    }
    assert!(engine.backend().peak_in_flight() <= MAX_FRAMES_IN_FLIGHT);
    assert_eq!(engine.backend().submission_count(), 20);
}

#[test]
fn test_pool_growth_rebuilds_binding_sets() {
    let mut engine = engine();

    let mut handles = Vec::new();
    for _ in 0..5 {
        handles.push(engine.load_geometry_data(unit_quad()).unwrap());
    }

    assert_eq!(engine.pool().geometry_capacity(), 8);
    assert_eq!(engine.pool().geometry_count(), 5);
    // One binding set per (slot, geometry) pair.
    assert_eq!(
        engine.backend().binding_set_count(),
        MAX_FRAMES_IN_FLIGHT * 5
    );
    // Earlier handles survived the growth.
    assert_eq!(engine.pool().index_count(handles[0]), 6);
}

#[test]
fn test_freed_handle_is_recycled() {
    let mut engine = engine();

    let first = engine.load_geometry_data(unit_quad()).unwrap();
    let _second = engine.load_geometry_data(unit_quad()).unwrap();

    engine.free_geometry(first);
    let recycled = engine.load_geometry_data(unit_cube()).unwrap();
    assert_eq!(recycled, first);
    assert_eq!(engine.pool().index_count(recycled), 36);
}

#[test]
fn test_stale_acquire_rebuilds_targets() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    let cam = spawn_camera(&mut engine);

    assert!(tick(&mut engine, &mut platform));
    assert!(
        !engine
            .world()
            .get_component::<CameraComponent>(cam)
            .unwrap()
            .dirty
    );

    platform.set_extent((800, 600));
    engine.backend_mut().set_extent((800, 600));
    engine.backend_mut().inject_stale_acquire();

    // The stale tick draws nothing and rebuilds.
    assert!(!tick(&mut engine, &mut platform));
    assert_eq!(engine.backend().surface_rebuild_count(), 1);
    assert_eq!(engine.backend().surface_extent(), (800, 600));
    assert!(
        engine
            .world()
            .get_component::<CameraComponent>(cam)
            .unwrap()
            .dirty
    );

    // The next tick renders normally at the new size.
    assert!(tick(&mut engine, &mut platform));
    assert_eq!(engine.backend().submission_count(), 2);
}

#[test]
fn test_camera_uniform_matches_camera_state() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    spawn_camera(&mut engine);

    assert!(tick(&mut engine, &mut platform));

    let bytes = engine.backend().camera_uniform(0).to_vec();
    assert_eq!(bytes.len(), CameraUbo::SIZE);
    let ubo: CameraUbo = bytemuck::pod_read_unaligned(&bytes);

    let defaults = CameraComponent::default();
    let expected_view = Mat4::look_at_rh(
        defaults.position,
        defaults.position + defaults.front,
        defaults.up,
    );
    assert_eq!(ubo.view, expected_view);
    // Vulkan clip space: Y points down.
    assert!(ubo.projection.y_axis.y < 0.0);
}

#[test]
fn test_lighting_uniform_gathers_scene_light() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    spawn_camera(&mut engine);

    // No light in the scene: ambient only.
    assert!(tick(&mut engine, &mut platform));
    let bytes = engine.backend().lighting_uniform(0).to_vec();
    let ubo: LightingUbo = bytemuck::pod_read_unaligned(&bytes);
    assert_eq!(ubo.ambient_color, Vec3::new(0.2, 0.2, 0.2));
    assert_eq!(ubo.ambient_intensity, 1.0);

    let light = engine.create_entity();
    engine.add_component(light, TransformComponent::at(Vec3::new(0.0, 4.0, 0.0)));
    engine.add_component(
        light,
        LightComponent {
            color: Vec3::new(1.0, 0.0, 0.0),
            intensity: 3.0,
            enabled: true,
        },
    );

    assert!(tick(&mut engine, &mut platform));
    let slot = 1 % MAX_FRAMES_IN_FLIGHT;
    let bytes = engine.backend().lighting_uniform(slot).to_vec();
    let ubo: LightingUbo = bytemuck::pod_read_unaligned(&bytes);
    assert_eq!(ubo.light_position, Vec3::new(0.0, 4.0, 0.0));
    assert_eq!(ubo.light_color, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(ubo.intensity, 3.0);
}

#[test]
fn test_minimized_window_skips_the_tick() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new((0, 0));

    let quad = engine.load_geometry_data(unit_quad()).unwrap();
    spawn_drawable(&mut engine, quad);
    spawn_camera(&mut engine);

    assert!(!tick(&mut engine, &mut platform));
    assert_eq!(engine.backend().submission_count(), 0);

    platform.set_extent(EXTENT);
    assert!(tick(&mut engine, &mut platform));
}

#[test]
fn test_exit_request_stops_the_engine() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);

    assert!(engine.is_running());
    platform.request_exit();
    assert!(!tick(&mut engine, &mut platform));
    assert!(!engine.is_running());
}

#[test]
fn test_held_key_moves_the_camera() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);
    let cam = spawn_camera(&mut engine);

    let before = engine
        .world()
        .get_component::<CameraComponent>(cam)
        .unwrap()
        .position;

    platform.press_key(KeyCode::KeyW);
    // Guarantee a non-zero delta time for the movement integration.
    sleep(Duration::from_millis(5));
    tick(&mut engine, &mut platform);

    let after = engine
        .world()
        .get_component::<CameraComponent>(cam)
        .unwrap()
        .position;
    // Default camera faces -Z.
    assert!(after.z < before.z);
    assert_eq!(after.x, before.x);
}

#[test]
fn test_escape_stops_the_engine() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);
    spawn_camera(&mut engine);

    platform.press_key(KeyCode::Escape);
    assert!(!tick(&mut engine, &mut platform));
    assert!(!engine.is_running());
}

#[test]
fn test_scroll_zooms_the_camera() {
    let mut engine = engine();
    let mut platform = HeadlessPlatform::new(EXTENT);
    let cam = spawn_camera(&mut engine);

    platform.scroll(10.0);
    tick(&mut engine, &mut platform);

    let camera = engine.world().get_component::<CameraComponent>(cam).unwrap();
    // Default 45 degree field of view narrowed by the scroll step.
    assert_eq!(camera.fov, 35.0);
}

#[test]
fn test_shutdown_releases_all_resources() {
    let mut engine = engine();
    engine.load_geometry_data(unit_cube()).unwrap();
    engine.load_geometry_data(unit_quad()).unwrap();

    engine.shutdown().unwrap();
    assert_eq!(engine.backend().live_buffer_count(), 0);
    assert_eq!(engine.backend().live_image_count(), 0);
}
