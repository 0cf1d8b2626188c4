//! Configuration system for the orrery demo.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields so old config files
//! keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BodyConfig, CaptureConfig, Config, DebugConfig, InputConfig, RenderConfig, SceneConfig,
    TimeConfig, WindowConfig,
};
pub use error::ConfigError;
