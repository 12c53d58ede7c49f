//! Integration tests for config file loading and command-line merging.

use std::io::Write;

use calib_capture::cli::{resolve_config, CaptureArgs};
use calib_capture::config::{CaptureConfig, CaptureMode, ConfigError, CropRect, VideoSource};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn test_full_file_resolves() {
    let file = write_config(
        r#"
video = 0
name = "left camera"
resolution = "1280x720"
resolutions = ["640x480", "1280x720"]
fps = 30.0
capture_mode = "any"
compression = "mjpg"
crop = "0,1;0.25,0.75"
"#,
    );

    let config = CaptureConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.video(), VideoSource::Index(0));
    assert_eq!(config.name(), Some("left camera"));
    assert_eq!(config.resolution().unwrap().to_string(), "1280x720");
    assert_eq!(config.resolutions().unwrap().len(), 2);
    assert_eq!(config.fps(), Some(30.0));
    assert_eq!(config.capture_mode(), CaptureMode::Any);
    assert!(config.threaded(), "threaded defaults to true");
    assert_eq!(config.compression(), Some("MJPG"));
    assert_eq!(
        config.crop().unwrap(),
        CropRect {
            x0: 0.0,
            x1: 1.0,
            y0: 0.25,
            y1: 0.75
        }
    );
}

#[test]
fn test_video_override_leaves_file_fields_untouched() {
    let file = write_config(
        r#"
video = 0
resolution = "1280x720"
resolutions = ["640x480", "1280x720"]
threaded = true
crop = "0,1;0.25,0.75"
"#,
    );

    let args = CaptureArgs {
        config: Some(file.path().to_path_buf()),
        video: Some("2".to_string()),
        ..Default::default()
    };
    let config = resolve_config(&args).unwrap();

    assert_eq!(*config.video(), VideoSource::Index(2));
    assert_eq!(config.resolution().unwrap().to_string(), "1280x720");
    assert!(config.threaded());
    assert_eq!(
        config.crop().unwrap(),
        CropRect {
            x0: 0.0,
            x1: 1.0,
            y0: 0.25,
            y1: 0.75
        }
    );
}

#[test]
fn test_resolution_override_checked_against_file_whitelist() {
    let file = write_config(
        r#"
video = 0
resolutions = ["640x480", "1280x720"]
"#,
    );

    let args = CaptureArgs {
        config: Some(file.path().to_path_buf()),
        resolution: Some("800x600".to_string()),
        ..Default::default()
    };
    let err = resolve_config(&args).unwrap_err();
    assert!(matches!(err, ConfigError::ResolutionNotAvailable(_)));

    let args = CaptureArgs {
        config: Some(file.path().to_path_buf()),
        resolution: Some("640x480".to_string()),
        ..Default::default()
    };
    let config = resolve_config(&args).unwrap();
    assert_eq!(config.resolution().unwrap().to_string(), "640x480");
}

#[test]
fn test_threaded_override_wins_over_file() {
    let file = write_config("video = 0\nthreaded = true\n");

    let args = CaptureArgs {
        config: Some(file.path().to_path_buf()),
        threaded: Some("false".to_string()),
        ..Default::default()
    };
    let config = resolve_config(&args).unwrap();
    assert!(!config.threaded());
}

#[test]
fn test_threaded_false_in_file() {
    let file = write_config("video = 0\nthreaded = false\n");
    let config = CaptureConfig::from_file(file.path()).unwrap();
    assert!(!config.threaded());
}

#[test]
fn test_file_resolution_whitelist_violation() {
    let file = write_config(
        r#"
video = 0
resolution = "800x600"
resolutions = ["640x480", "1280x720"]
"#,
    );

    let err = CaptureConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ResolutionNotAvailable(_)));
    assert!(err.to_string().contains("800x600"));
}

#[test]
fn test_resolution_as_pair() {
    let file = write_config("video = 0\nresolution = [1920, 1080]\n");
    let config = CaptureConfig::from_file(file.path()).unwrap();
    assert_eq!(config.resolution().unwrap().to_string(), "1920x1080");
}

#[test]
fn test_video_as_device_path() {
    let file = write_config("video = \"/dev/video2\"\n");
    let config = CaptureConfig::from_file(file.path()).unwrap();
    assert_eq!(
        *config.video(),
        VideoSource::Path("/dev/video2".to_string())
    );
}

#[test]
fn test_numeric_string_video_normalized() {
    let file = write_config("video = \"3\"\n");
    let config = CaptureConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.video(), VideoSource::Index(3));
}

#[test]
fn test_bad_compression_in_file() {
    let file = write_config("video = 0\ncompression = \"zzzz\"\n");
    let err = CaptureConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidCompression(_)));
}

#[test]
fn test_bad_capture_mode_in_file() {
    let file = write_config("video = 0\ncapture_mode = \"gstreamer\"\n");
    let err = CaptureConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidCaptureMode(_)));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = CaptureConfig::from_file(std::path::Path::new("/nonexistent/capture.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_unparseable_file_names_the_path() {
    let file = write_config("video = [not toml");
    let err = CaptureConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err
        .to_string()
        .contains(&file.path().display().to_string()));
}
