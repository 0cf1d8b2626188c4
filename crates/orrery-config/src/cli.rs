//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Sun, earth and moon cubes in orbit")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Day value rendered on the first frame.
    #[arg(long)]
    pub day: Option<f64>,

    /// Advance the day over time instead of holding it fixed.
    #[arg(long)]
    pub animate: Option<bool>,

    /// Simulated days per second when animating.
    #[arg(long)]
    pub days_per_second: Option<f64>,

    /// File name prefix for framebuffer captures.
    #[arg(long)]
    pub capture_prefix: Option<String>,

    /// Directory for framebuffer captures.
    #[arg(long)]
    pub capture_dir: Option<PathBuf>,

    /// Directory to load the WGSL shader pair from.
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(day) = args.day {
            self.time.start_day = day;
        }
        if let Some(animate) = args.animate {
            self.time.animate = animate;
        }
        if let Some(rate) = args.days_per_second {
            self.time.days_per_second = rate;
        }
        if let Some(ref prefix) = args.capture_prefix {
            self.capture.prefix = prefix.clone();
        }
        if let Some(ref dir) = args.capture_dir {
            self.capture.output_dir = Some(dir.clone());
        }
        if let Some(ref dir) = args.shader_dir {
            self.render.shader_dir = Some(dir.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            day: Some(365.0),
            capture_prefix: Some("shot_".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.time.start_day, 365.0);
        assert_eq!(config.capture.prefix, "shot_");
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 768);
        assert!(!config.time.animate);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "orrery",
            "--animate",
            "true",
            "--days-per-second",
            "5",
            "--capture-dir",
            "shots",
        ]);
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert!(config.time.animate);
        assert_eq!(config.time.days_per_second, 5.0);
        assert_eq!(config.capture.output_dir, Some(PathBuf::from("shots")));
    }
}
