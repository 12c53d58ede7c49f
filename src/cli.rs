//! Command-line surface and config merging.
//!
//! Precedence is field-by-field: command-line overrides beat file-provided
//! values, which beat built-in defaults. Overrides go through the same
//! validating setters used at construction.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{resolve_video, CaptureConfig, ConfigError};

/// calib-capture: configure and open a camera for the calibration pipeline
#[derive(Parser, Debug, Default)]
#[command(name = "calib-capture")]
#[command(version, about = "Video capture front-end for camera calibration")]
pub struct CaptureArgs {
    /// Capture configuration file (.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Video device to open, e.g. 0 or /dev/video0 (overrides the file)
    #[arg(short = 'v', long)]
    pub video: Option<String>,

    /// Requested resolution as WIDTHxHEIGHT (overrides the file)
    #[arg(short = 'r', long)]
    pub resolution: Option<String>,

    /// Capture in a separate thread; "false" disables (overrides the file)
    #[arg(short = 't', long)]
    pub threaded: Option<String>,
}

/// Resolve the canonical configuration from the file (if any) plus the
/// command-line overrides. Without a config file, `--video` is required.
pub fn resolve_config(args: &CaptureArgs) -> Result<CaptureConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => CaptureConfig::from_file(path)?,
        None => {
            let video = args.video.as_deref().ok_or(ConfigError::MissingVideo)?;
            CaptureConfig::new(resolve_video(video))
        }
    };

    if let Some(video) = args.video.as_deref().filter(|v| !v.is_empty()) {
        config.set_video(video);
    }
    if let Some(resolution) = args.resolution.as_deref().filter(|r| !r.is_empty()) {
        config.set_resolution(resolution)?;
    }
    if let Some(threaded) = args.threaded.as_deref().filter(|t| !t.is_empty()) {
        config.set_threaded(threaded);
    }

    Ok(config)
}
