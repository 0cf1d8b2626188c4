//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering and camera settings.
    pub render: RenderConfig,
    /// Simulation time settings.
    pub time: TimeConfig,
    /// Orbital constants for the three bodies.
    pub scene: SceneConfig,
    /// Framebuffer capture settings.
    pub capture: CaptureConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Background color in 0..1. Written to the framebuffer without sRGB
    /// encoding, so 0.3 is captured as 77.
    pub clear_color: [f64; 3],
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Camera position; the camera always looks at the origin.
    pub camera_eye: [f32; 3],
    /// Directory holding `orrery.vert.wgsl` and `orrery.frag.wgsl`.
    /// The built-in shaders are used when unset.
    pub shader_dir: Option<PathBuf>,
}

/// Simulation time configuration.
///
/// With `animate` off every frame is rendered at `start_day`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    /// Day value of the first frame (and of every frame when not animating).
    pub start_day: f64,
    /// Advance the day with simulated time.
    pub animate: bool,
    /// Simulated days per second of wall-clock time when animating.
    pub days_per_second: f64,
}

/// Constants for a single orbiting body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Distance from the parent's center (0 for the root body).
    pub orbit_radius: f64,
    /// Days per revolution around the parent.
    pub orbital_period: f64,
    /// Days per revolution around the body's own axis.
    pub spin_period: f64,
    /// Axial tilt in degrees.
    pub axial_tilt_degrees: f64,
    /// Uniform scale applied to the unit cube.
    pub scale: f32,
}

/// Orbital constants for the sun, earth and moon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub sun: BodyConfig,
    pub earth: BodyConfig,
    pub moon: BodyConfig,
}

/// Framebuffer capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// File name prefix; the capture id and `.ppm` are appended.
    pub prefix: String,
    /// Directory for capture files. `None` writes to the working directory.
    pub output_dir: Option<PathBuf>,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.3, 0.4, 0.5],
            fov_y_degrees: 30.0,
            near: 0.1,
            far: 1000.0,
            camera_eye: [80.0, 70.0, 60.0],
            shader_dir: None,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_day: 100.0,
            animate: false,
            days_per_second: 1.0,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 0.0,
            orbital_period: 1.0,
            spin_period: 1.0,
            axial_tilt_degrees: 0.0,
            scale: 1.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sun: BodyConfig {
                orbit_radius: 0.0,
                orbital_period: 1.0,
                spin_period: 27.0,
                axial_tilt_degrees: 0.0,
                scale: 12.0,
            },
            earth: BodyConfig {
                orbit_radius: 24.0,
                orbital_period: 365.0,
                spin_period: 1.0,
                axial_tilt_degrees: 23.4,
                scale: 6.0,
            },
            moon: BodyConfig {
                orbit_radius: 12.0,
                orbital_period: 28.0,
                spin_period: 28.0,
                axial_tilt_degrees: 0.0,
                scale: 3.0,
            },
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            prefix: "rotate_d365".to_string(),
            output_dir: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Persistence ---

impl Config {
    /// Read `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        let config = read_config(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::create_dir_all(config_dir).map_err(write_err)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-read `config.ron`. `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk");
        Ok(Some(fresh))
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
