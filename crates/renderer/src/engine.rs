//! The engine facade.
//!
//! [`Engine`] owns the world, the resource pool, the frame pipeline and a
//! device backend, and exposes the whole runtime as one object. The
//! embedding application creates entities and loads resources through it,
//! then drives one tick per frame with [`Engine::begin_frame`] and
//! [`Engine::end_frame`].

use std::path::Path;

use glam::Vec3;
use tracing::{debug, info, warn};

use ember_core::{Settings, Timer};
use ember_ecs::systems::{
    self, active_camera, gather_lighting, mark_cameras_dirty, update_cameras, update_transforms,
};
use ember_ecs::{CameraComponent, Component, Entity, World};
use ember_gpu::{
    DecodedImage, DecodedMesh, GeometryHandle, GpuBackend, ResourcePool, TextureHandle,
};
use ember_platform::{KeyCode, MouseButton, Platform};

use crate::error::EngineResult;
use crate::frame::FramePipeline;
use crate::ubo::{CameraUbo, LightingUbo};
use crate::walker::record_scene;

/// The runtime: world, resources, frame pipeline and device backend.
///
/// Single-threaded; every method is called from the application's main
/// loop. Resource loads and frees must happen between frames, never
/// between [`Engine::begin_frame`] and [`Engine::end_frame`].
pub struct Engine<G: GpuBackend> {
    backend: G,
    pool: ResourcePool,
    world: World,
    pipeline: FramePipeline,
    timer: Timer,
    settings: Settings,
    // Target acquired by begin_frame, consumed by end_frame.
    pending_target: Option<u32>,
    running: bool,
}

impl<G: GpuBackend> Engine<G> {
    /// Create an engine over `backend` with the given settings.
    pub fn new(backend: G, settings: Settings) -> Self {
        let frames = backend.frames_in_flight();
        info!(
            application = %settings.application_name,
            frames_in_flight = frames,
            "Engine created"
        );
        Self {
            backend,
            pool: ResourcePool::new(),
            world: World::new(),
            pipeline: FramePipeline::new(frames),
            timer: Timer::new(),
            settings,
            pending_target: None,
            running: true,
        }
    }

    /// The entity world.
    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The entity world, mutably.
    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The device backend.
    #[inline]
    pub fn backend(&self) -> &G {
        &self.backend
    }

    /// The device backend, mutably. Mutating device state mid-frame is
    /// unsupported.
    #[inline]
    pub fn backend_mut(&mut self) -> &mut G {
        &mut self.backend
    }

    /// The resource pool.
    #[inline]
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Startup settings.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the engine should keep ticking.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the main loop after the current tick.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Create an entity; [`Entity::NONE`] when the world is full.
    pub fn create_entity(&mut self) -> Entity {
        self.world.create_entity()
    }

    /// Attach a component to an entity.
    pub fn add_component<C: Component>(&mut self, entity: Entity, value: C) {
        self.world.add_component(entity, value);
    }

    /// Set the position of an entity's transform.
    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        self.world.set_position(entity, position);
    }

    /// Set the Euler rotation (radians) of an entity's transform.
    pub fn set_rotation(&mut self, entity: Entity, rotation: Vec3) {
        self.world.set_rotation(entity, rotation);
    }

    /// Set the scale of an entity's transform.
    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) {
        self.world.set_scale(entity, scale);
    }

    /// Move an entity by a delta.
    pub fn translate(&mut self, entity: Entity, delta: Vec3) {
        self.world.translate(entity, delta);
    }

    /// Make `entity`'s camera the active one, deactivating all others.
    pub fn set_active_camera(&mut self, entity: Entity) {
        for i in 0..self.world.entities().len() {
            let e = self.world.entities()[i];
            if let Some(camera) = self.world.get_component_mut::<CameraComponent>(e) {
                camera.active = e == entity;
            }
        }
    }

    /// Load an OBJ model from disk into the pool.
    pub fn load_geometry(&mut self, path: &Path) -> EngineResult<GeometryHandle> {
        let mesh = ember_assets::load_obj(path)?;
        self.load_geometry_data(mesh)
    }

    /// Upload an already decoded mesh into the pool.
    pub fn load_geometry_data(&mut self, mesh: DecodedMesh) -> EngineResult<GeometryHandle> {
        let handle = self.pool.load_geometry(&mut self.backend, mesh)?;
        self.rebuild_binding_sets()?;
        Ok(handle)
    }

    /// Load an image from disk into the pool.
    pub fn load_texture(&mut self, path: &Path) -> EngineResult<TextureHandle> {
        let image = ember_assets::load_image(path)?;
        self.load_texture_data(image)
    }

    /// Upload an already decoded image into the pool.
    pub fn load_texture_data(&mut self, image: DecodedImage) -> EngineResult<TextureHandle> {
        let handle = self.pool.load_texture(&mut self.backend, image)?;
        self.rebuild_binding_sets()?;
        Ok(handle)
    }

    /// Free a geometry handle; its device buffers are released
    /// immediately, so the handle must not be referenced by any entity
    /// still being drawn.
    pub fn free_geometry(&mut self, handle: GeometryHandle) {
        self.pool.free_geometry(&mut self.backend, handle);
    }

    /// Free a texture handle.
    pub fn free_texture(&mut self, handle: TextureHandle) {
        self.pool.free_texture(&mut self.backend, handle);
    }

    // Binding sets exist per (slot, geometry) pair, so every change to the
    // resource families replaces the whole table. Scales poorly with large
    // pools; acceptable at the pool sizes this runtime targets.
    fn rebuild_binding_sets(&mut self) -> EngineResult<()> {
        self.backend.rebuild_binding_sets(
            self.pipeline.frames(),
            self.pool.geometry_count() as usize,
        )?;
        Ok(())
    }

    /// Run one tick up to and including draw recording.
    ///
    /// Consumes input, advances the CPU systems, begins the frame on the
    /// current slot, writes the per-slot uniforms and records the scene.
    /// Returns `false` when no frame was begun this tick: the window is
    /// minimized, exit was requested, or the target set was stale and was
    /// rebuilt instead.
    pub fn begin_frame<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EngineResult<bool> {
        debug_assert!(self.pending_target.is_none(), "unfinished frame");

        let delta = self.timer.delta_secs();

        if platform.exit_requested() || platform.input().is_key_just_pressed(KeyCode::Escape) {
            self.running = false;
            return Ok(false);
        }

        let extent = platform.drawable_extent();
        if extent.0 == 0 || extent.1 == 0 {
            // Minimized; nothing to draw and no target to acquire.
            platform.input_mut().begin_tick();
            return Ok(false);
        }

        self.process_camera_input(platform, delta);
        platform.input_mut().begin_tick();

        let aspect = extent.0 as f32 / extent.1 as f32;
        update_transforms(&mut self.world);
        update_cameras(&mut self.world, aspect);

        let slot = self.pipeline.slot();
        let target = match self.pipeline.begin(&mut self.backend)? {
            Some(target) => target,
            None => {
                self.rebuild_stale_targets(extent)?;
                return Ok(false);
            }
        };

        self.write_uniforms(slot);
        let draws = record_scene(&self.world, &self.pool, &mut self.backend, slot);
        debug!(slot, target, draws, "Frame recorded");

        self.pending_target = Some(target);
        Ok(true)
    }

    /// Submit and present the frame begun by [`Engine::begin_frame`].
    ///
    /// No-op when no frame was begun. If presentation reports a stale
    /// target the target set is rebuilt before returning.
    pub fn end_frame<P: Platform + ?Sized>(&mut self, platform: &mut P) -> EngineResult<()> {
        let Some(target) = self.pending_target.take() else {
            return Ok(());
        };

        if self.pipeline.finish(&mut self.backend, target)? {
            let extent = platform.drawable_extent();
            self.rebuild_stale_targets(extent)?;
        }
        Ok(())
    }

    fn write_uniforms(&mut self, slot: usize) {
        let camera_ubo = match active_camera(&self.world)
            .and_then(|e| self.world.get_component::<CameraComponent>(e))
        {
            Some(camera) => CameraUbo::new(camera.view, camera.projection),
            None => {
                warn!("No active camera; rendering with identity matrices");
                CameraUbo::default()
            }
        };
        self.backend
            .write_camera_uniform(slot, bytemuck::bytes_of(&camera_ubo));

        let mut lighting = LightingUbo::default();
        if let Some(info) = gather_lighting(&self.world) {
            lighting.light_position = info.position;
            lighting.light_color = info.color;
            lighting.intensity = info.intensity;
        }
        lighting.view_position = camera_ubo.view.inverse().w_axis.truncate();
        self.backend
            .write_lighting_uniform(slot, bytemuck::bytes_of(&lighting));
    }

    fn process_camera_input<P: Platform + ?Sized>(&mut self, platform: &P, delta: f32) {
        let Some(entity) = active_camera(&self.world) else {
            return;
        };
        let Some(camera) = self.world.get_component::<CameraComponent>(entity).copied() else {
            return;
        };
        let input = platform.input();

        let mut direction = Vec3::ZERO;
        if input.is_key_pressed(KeyCode::KeyW) {
            direction += camera.front;
        }
        if input.is_key_pressed(KeyCode::KeyS) {
            direction -= camera.front;
        }
        if input.is_key_pressed(KeyCode::KeyD) {
            direction += camera.right;
        }
        if input.is_key_pressed(KeyCode::KeyA) {
            direction -= camera.right;
        }
        if input.is_key_pressed(KeyCode::Space) {
            direction += camera.world_up;
        }
        if input.is_key_pressed(KeyCode::ShiftLeft) {
            direction -= camera.world_up;
        }
        systems::move_camera(&mut self.world, entity, direction, delta);

        if input.is_mouse_pressed(MouseButton::Right) {
            let (dx, dy) = input.mouse_delta();
            if dx != 0.0 || dy != 0.0 {
                // Screen Y grows downward; pitch grows upward.
                systems::rotate_camera(&mut self.world, entity, dx, -dy);
            }
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            if let Some(camera) = self.world.get_component_mut::<CameraComponent>(entity) {
                camera.fov = (camera.fov - scroll).clamp(1.0, 90.0);
                camera.dirty = true;
            }
        }
    }

    /// Rebuild everything that depends on the presentation target set.
    fn rebuild_stale_targets(&mut self, extent: (u32, u32)) -> EngineResult<()> {
        info!(?extent, "Rebuilding stale presentation targets");
        self.backend.wait_idle()?;
        self.backend.recreate_surface(extent)?;
        self.rebuild_binding_sets()?;
        // Projections must pick up the new aspect ratio.
        mark_cameras_dirty(&mut self.world);
        Ok(())
    }

    /// Wait for the device and release every pooled resource.
    ///
    /// Called from `Drop`; call it explicitly to observe failures.
    pub fn shutdown(&mut self) -> EngineResult<()> {
        self.backend.wait_idle()?;
        self.pool.release_all(&mut self.backend);
        info!("Engine shut down");
        Ok(())
    }
}

impl<G: GpuBackend> Drop for Engine<G> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "Engine shutdown failed");
        }
    }
}
