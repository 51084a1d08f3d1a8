//! Demo application: a small lit cube scene with a fly camera.

use anyhow::Result;
use glam::Vec3;
use tracing::{error, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use ember_assets::{unit_cube, unit_quad};
use ember_core::Settings;
use ember_ecs::{
    CameraComponent, LightComponent, MeshRendererComponent, TransformComponent,
    VisibilityComponent,
};
use ember_gpu::{HeadlessGpu, MAX_FRAMES_IN_FLIGHT};
use ember_platform::{Platform, Window, WindowPlatform};
use ember_renderer::{Engine, EngineResult};

struct App {
    settings: Settings,
    platform: Option<WindowPlatform>,
    engine: Option<Engine<HeadlessGpu>>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            platform: None,
            engine: None,
        }
    }

    fn build_scene(engine: &mut Engine<HeadlessGpu>) -> EngineResult<()> {
        let cube = engine.load_geometry_data(unit_cube())?;
        let quad = engine.load_geometry_data(unit_quad())?;

        for (i, position) in [
            Vec3::new(-1.5, 0.5, 0.0),
            Vec3::new(0.0, 0.5, -1.0),
            Vec3::new(1.5, 0.5, 0.5),
        ]
        .into_iter()
        .enumerate()
        {
            let e = engine.create_entity();
            engine.add_component(e, TransformComponent::at(position));
            engine.set_rotation(e, Vec3::new(0.0, 0.4 * i as f32, 0.0));
            engine.add_component(
                e,
                MeshRendererComponent {
                    mesh: cube.0,
                    texture: 0,
                },
            );
            engine.add_component(e, VisibilityComponent::default());
        }

        // Ground plane.
        let ground = engine.create_entity();
        engine.add_component(ground, TransformComponent::default());
        engine.set_rotation(ground, Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        engine.set_scale(ground, Vec3::splat(10.0));
        engine.add_component(
            ground,
            MeshRendererComponent {
                mesh: quad.0,
                texture: 0,
            },
        );
        engine.add_component(ground, VisibilityComponent::default());

        let light = engine.create_entity();
        engine.add_component(light, TransformComponent::at(Vec3::new(2.0, 4.0, 2.0)));
        engine.add_component(
            light,
            LightComponent {
                color: Vec3::ONE,
                intensity: 2.0,
                enabled: true,
            },
        );

        let camera = engine.create_entity();
        engine.add_component(
            camera,
            CameraComponent {
                position: Vec3::new(0.0, 1.5, 5.0),
                ..CameraComponent::default()
            },
        );
        engine.set_active_camera(camera);

        info!(entities = engine.world().live_count(), "Scene built");
        Ok(())
    }

    fn run_frame(
        engine: &mut Engine<HeadlessGpu>,
        platform: &mut WindowPlatform,
    ) -> EngineResult<()> {
        engine.begin_frame(platform)?;
        engine.end_frame(platform)
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(engine), Some(platform)) = (self.engine.as_mut(), self.platform.as_mut()) else {
            return;
        };

        if let Err(e) = Self::run_frame(engine, platform) {
            error!(error = %e, "Frame failed");
            event_loop.exit();
            return;
        }

        if !engine.is_running() {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.platform.is_some() {
            return;
        }

        let window = match Window::new(event_loop, &self.settings) {
            Ok(window) => window,
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
                return;
            }
        };
        let platform = WindowPlatform::new(window);

        let backend = HeadlessGpu::new(MAX_FRAMES_IN_FLIGHT, platform.drawable_extent());
        let mut engine = Engine::new(backend, self.settings.clone());
        if let Err(e) = Self::build_scene(&mut engine) {
            error!(error = %e, "Failed to build scene");
            event_loop.exit();
            return;
        }

        info!("Initialization complete, entering main loop");
        self.platform = Some(platform);
        self.engine = Some(engine);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(platform) = self.platform.as_mut() {
            platform.on_window_event(&event);
        }

        if let WindowEvent::RedrawRequested = event {
            self.tick(event_loop);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(platform) = self.platform.as_ref() {
            platform.window().request_redraw();
        }
    }
}

fn main() -> Result<()> {
    ember_core::init_logging();
    info!("Starting Ember");

    let settings = Settings::new()
        .with_title("Ember")
        .with_size(1280, 720)
        .with_background([0.02, 0.02, 0.05, 1.0]);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    Ok(())
}
