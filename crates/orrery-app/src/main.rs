//! Opens the orrery window: a sun, earth and moon rendered as colored cubes.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `orrery --day 365 --animate true`. Press `P` to save the
//! current frame as a PPM image and `Escape` to quit.

use std::process::ExitCode;

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => Some(PlatformDirs::rooted_at(dir)),
        None => PlatformDirs::resolve()
            .inspect_err(|e| eprintln!("{e}, running without a config directory"))
            .ok(),
    };

    if let Some(dirs) = &dirs
        && let Err(e) = dirs.create_dirs()
    {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    let mut config = match &dirs {
        Some(dirs) => Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(
        dirs.as_ref().map(|d| d.log_dir.as_path()),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(
        "Starting orrery at day {} ({})",
        config.time.start_day,
        if config.time.animate {
            "animated"
        } else {
            "fixed"
        }
    );

    match orrery_app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting: {e}");
            ExitCode::FAILURE
        }
    }
}
