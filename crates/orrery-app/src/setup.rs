//! Builds scene, clock, camera and capture state from a [`Config`].

use glam::Vec3;
use orrery_capture::FrameDumper;
use orrery_config::{BodyConfig, Config, RenderConfig, SceneConfig, TimeConfig};
use orrery_input::ActionMap;
use orrery_scene::{Body, BodyParams, Camera, DayClock, SolarSystem, TimeMode};
use winit::window::WindowAttributes;

/// Window title and logical size from the `window` section.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

/// The three bodies with constants from the `scene` section. Spin and tilt
/// axes are fixed per body.
pub fn solar_system_from_config(scene: &SceneConfig) -> SolarSystem {
    let reference = SolarSystem::reference();
    let with = |body: Body, cfg: &BodyConfig| BodyParams {
        orbit_radius: cfg.orbit_radius,
        orbital_period: cfg.orbital_period,
        spin_period: cfg.spin_period,
        axial_tilt_degrees: cfg.axial_tilt_degrees,
        scale: cfg.scale,
        ..reference.params(body).clone()
    };
    SolarSystem::new(
        with(Body::Sun, &scene.sun),
        with(Body::Earth, &scene.earth),
        with(Body::Moon, &scene.moon),
    )
}

/// Fixed at `start_day` unless `animate` is set.
pub fn clock_from_config(time: &TimeConfig) -> DayClock {
    if time.animate {
        DayClock::new(TimeMode::Advancing {
            start_day: time.start_day,
            days_per_second: time.days_per_second,
        })
    } else {
        DayClock::fixed(time.start_day)
    }
}

/// Camera at `camera_eye` looking at the origin.
pub fn camera_from_config(render: &RenderConfig) -> Camera {
    Camera::looking_at_origin(
        Vec3::from_array(render.camera_eye),
        render.fov_y_degrees,
        render.near,
        render.far,
    )
}

pub fn dumper_from_config(config: &Config) -> FrameDumper {
    match &config.capture.output_dir {
        Some(dir) => FrameDumper::with_output_dir(config.capture.prefix.clone(), dir),
        None => FrameDumper::new(config.capture.prefix.clone()),
    }
}

pub fn action_map_from_config(config: &Config) -> ActionMap {
    ActionMap::with_overrides(&config.input.keybindings)
}
