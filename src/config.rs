//! Capture configuration: parsing, validation, and merging.
//!
//! Every field has its own pure validating resolver so the same rules apply
//! whether a value comes from the config file or a command-line override.
//! The resulting [`CaptureConfig`] is canonical: consumers that need to change
//! a field go through the validating setters, never through direct mutation.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Known FourCC compression codes with their human-readable names.
pub const COMPRESSIONS: &[(&str, &str)] = &[
    ("XVID", "XviD MPEG-4"),
    ("MJPG", "Motion JPEG"),
    ("H264", "H.264 / AVC"),
    ("DIVX", "DivX MPEG-4"),
    ("MP4V", "MPEG-4 Video"),
    ("I420", "Uncompressed YUV"),
];

/// Errors raised while resolving configuration fields.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid resolution '{0}': expected WIDTHxHEIGHT (e.g. 1280x720)")]
    InvalidResolution(String),
    #[error("resolution {0} not available")]
    ResolutionNotAvailable(Resolution),
    #[error("capture mode '{0}' not available (expected auto, dshow or any)")]
    InvalidCaptureMode(String),
    #[error("compression type '{0}' not valid")]
    InvalidCompression(String),
    #[error(
        "invalid crop '{0}': must be in the format '<x_from>,<x_to>;<y_from>,<y_to>' \
         with values in [0.0 .. 1.0]"
    )]
    MalformedCrop(String),
    #[error("invalid crop '{0}': values must be expressed as a proportion of the image, in [0.0 .. 1.0]")]
    CropOutOfRange(String),
    #[error("invalid crop '{0}': from-values must not exceed to-values")]
    CropInverted(String),
    #[error("no video device specified: pass --video or a config file")]
    MissingVideo,
}

/// Identifier of the device to open: an integer index or a path/URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    Index(u32),
    Path(String),
}

impl fmt::Display for VideoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoSource::Index(i) => write!(f, "{}", i),
            VideoSource::Path(p) => write!(f, "{}", p),
        }
    }
}

/// Normalize a device identifier: a purely-numeric string becomes an index.
pub fn resolve_video(source: &str) -> VideoSource {
    match source.parse::<u32>() {
        Ok(index) => VideoSource::Index(index),
        Err(_) => VideoSource::Path(source.to_string()),
    }
}

/// A capture resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidResolution(s.to_string());
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Resolution {
            width: w.trim().parse().map_err(|_| invalid())?,
            height: h.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Which OS capture API to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    #[default]
    Auto,
    Dshow,
    Any,
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureMode::Auto => "auto",
            CaptureMode::Dshow => "dshow",
            CaptureMode::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// Resolve a capture mode. Absent or empty defaults to `auto`.
pub fn resolve_capture_mode(mode: Option<&str>) -> Result<CaptureMode, ConfigError> {
    match mode {
        None | Some("") => Ok(CaptureMode::Auto),
        Some("auto") => Ok(CaptureMode::Auto),
        Some("dshow") => Ok(CaptureMode::Dshow),
        Some("any") => Ok(CaptureMode::Any),
        Some(other) => Err(ConfigError::InvalidCaptureMode(other.to_string())),
    }
}

/// Resolve a FourCC compression code: upper-cased and checked against the
/// known set. Absent passes through as `None`.
pub fn resolve_compression(code: Option<&str>) -> Result<Option<String>, ConfigError> {
    let Some(code) = code else {
        return Ok(None);
    };
    if code.is_empty() {
        return Ok(None);
    }
    let upper = code.to_ascii_uppercase();
    if COMPRESSIONS.iter().any(|(c, _)| *c == upper) {
        Ok(Some(upper))
    } else {
        Err(ConfigError::InvalidCompression(code.to_string()))
    }
}

/// Description of a known FourCC code, for logging.
pub fn compression_description(code: &str) -> Option<&'static str> {
    COMPRESSIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
}

/// Resolve a `--threaded` override value. Threading is on by default: only the
/// literal string "false" (any case) disables it, anything else is truthy.
pub fn resolve_threaded(value: Option<&str>) -> bool {
    match value {
        Some(v) => !v.eq_ignore_ascii_case("false"),
        None => true,
    }
}

/// A crop region in fractions of the image extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl CropRect {
    /// Pixel bounds of the crop for a frame of the given extent, computed as
    /// `round(fraction * extent)` and clamped to the frame.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> (Range<usize>, Range<usize>) {
        let bound = |frac: f64, extent: u32| -> usize {
            ((frac * extent as f64).round() as usize).min(extent as usize)
        };
        let x = bound(self.x0, width)..bound(self.x1, width);
        let y = bound(self.y0, height)..bound(self.y1, height);
        (x, y)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{};{},{}", self.x0, self.x1, self.y0, self.y1)
    }
}

/// Parse a crop spec of the form `"<x_from>,<x_to>;<y_from>,<y_to>"`.
/// Absent or empty input is no crop.
pub fn resolve_crop(spec: Option<&str>) -> Result<Option<CropRect>, ConfigError> {
    let Some(spec) = spec else {
        return Ok(None);
    };
    if spec.is_empty() {
        return Ok(None);
    }

    let malformed = || ConfigError::MalformedCrop(spec.to_string());

    let axes: Vec<&str> = spec.split(';').collect();
    let [x_axis, y_axis] = axes[..] else {
        return Err(malformed());
    };
    let parse_axis = |axis: &str| -> Result<(f64, f64), ConfigError> {
        let mut parts = axis.split(',');
        let (from, to) = match (parts.next(), parts.next(), parts.next()) {
            (Some(from), Some(to), None) => (from, to),
            _ => return Err(malformed()),
        };
        let from: f64 = from.trim().parse().map_err(|_| malformed())?;
        let to: f64 = to.trim().parse().map_err(|_| malformed())?;
        Ok((from, to))
    };
    let (x0, x1) = parse_axis(x_axis)?;
    let (y0, y1) = parse_axis(y_axis)?;

    for v in [x0, x1, y0, y1] {
        if !(0.0..=1.0).contains(&v) {
            return Err(ConfigError::CropOutOfRange(spec.to_string()));
        }
    }
    if x0 > x1 || y0 > y1 {
        return Err(ConfigError::CropInverted(spec.to_string()));
    }

    Ok(Some(CropRect { x0, x1, y0, y1 }))
}

/// Parse the whitelist (if any), then validate the requested resolution
/// against it. A requested resolution outside a non-empty whitelist is an
/// error.
pub fn resolve_resolutions(
    resolution: Option<Resolution>,
    resolutions: Option<Vec<Resolution>>,
) -> Result<(Option<Resolution>, Option<Vec<Resolution>>), ConfigError> {
    if let (Some(res), Some(list)) = (resolution, resolutions.as_ref()) {
        if !list.is_empty() && !list.contains(&res) {
            return Err(ConfigError::ResolutionNotAvailable(res));
        }
    }
    Ok((resolution, resolutions))
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// A field that may be an integer index or a path string in the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VideoValue {
    Index(u32),
    Text(String),
}

/// A resolution written either as `"WxH"` or as a `[w, h]` pair.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResolutionValue {
    Text(String),
    Pair(u32, u32),
}

impl ResolutionValue {
    fn resolve(&self) -> Result<Resolution, ConfigError> {
        match self {
            ResolutionValue::Text(s) => s.parse(),
            ResolutionValue::Pair(w, h) => Ok(Resolution {
                width: *w,
                height: *h,
            }),
        }
    }
}

/// Raw file contents before resolution. Recognized keys only.
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    video: Option<VideoValue>,
    name: Option<String>,
    resolution: Option<ResolutionValue>,
    resolutions: Option<Vec<ResolutionValue>>,
    fps: Option<f64>,
    capture_mode: Option<String>,
    #[serde(default = "default_true")]
    threaded: bool,
    compression: Option<String>,
    crop: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Canonical config
// ---------------------------------------------------------------------------

/// Canonical capture configuration.
///
/// Immutable after construction except through the validating setters, which
/// apply the same rules as the resolvers used by [`CaptureConfig::from_file`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    video: VideoSource,
    resolution: Option<Resolution>,
    resolutions: Option<Vec<Resolution>>,
    fps: Option<f64>,
    capture_mode: CaptureMode,
    name: Option<String>,
    threaded: bool,
    compression: Option<String>,
    crop: Option<CropRect>,
}

impl CaptureConfig {
    /// A minimal config for the given device, everything else defaulted.
    pub fn new(video: VideoSource) -> Self {
        Self {
            video,
            resolution: None,
            resolutions: None,
            fps: None,
            capture_mode: CaptureMode::Auto,
            name: None,
            threaded: true,
            compression: None,
            crop: None,
        }
    }

    /// Load and resolve a configuration file.
    ///
    /// Fields are resolved in order: video, resolutions/resolution,
    /// capture_mode, compression, crop, then the passthrough scalars
    /// (name, fps, threaded). The file's `threaded` is a plain bool that
    /// defaults to true when absent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let video = match raw.video {
            Some(VideoValue::Index(i)) => VideoSource::Index(i),
            Some(VideoValue::Text(s)) => resolve_video(&s),
            None => return Err(ConfigError::MissingVideo),
        };

        let resolution = raw.resolution.as_ref().map(|r| r.resolve()).transpose()?;
        let resolutions = raw
            .resolutions
            .as_ref()
            .map(|list| list.iter().map(|r| r.resolve()).collect::<Result<_, _>>())
            .transpose()?;
        let (resolution, resolutions) = resolve_resolutions(resolution, resolutions)?;

        Ok(Self {
            video,
            resolution,
            resolutions,
            fps: raw.fps,
            capture_mode: resolve_capture_mode(raw.capture_mode.as_deref())?,
            name: raw.name,
            threaded: raw.threaded,
            compression: resolve_compression(raw.compression.as_deref())?,
            crop: resolve_crop(raw.crop.as_deref())?,
        })
    }

    pub fn video(&self) -> &VideoSource {
        &self.video
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn resolutions(&self) -> Option<&[Resolution]> {
        self.resolutions.as_deref()
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn capture_mode(&self) -> CaptureMode {
        self.capture_mode
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn threaded(&self) -> bool {
        self.threaded
    }

    pub fn compression(&self) -> Option<&str> {
        self.compression.as_deref()
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    /// Replace the device id, normalizing numeric strings to indices.
    pub fn set_video(&mut self, source: &str) {
        self.video = resolve_video(source);
    }

    /// Replace the requested resolution, validated against the whitelist.
    pub fn set_resolution(&mut self, spec: &str) -> Result<(), ConfigError> {
        let resolution: Resolution = spec.parse()?;
        if let Some(list) = &self.resolutions {
            if !list.is_empty() && !list.contains(&resolution) {
                return Err(ConfigError::ResolutionNotAvailable(resolution));
            }
        }
        self.resolution = Some(resolution);
        Ok(())
    }

    /// Replace the threading flag from an override string.
    pub fn set_threaded(&mut self, value: &str) {
        self.threaded = resolve_threaded(Some(value));
    }
}

impl fmt::Display for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source: {};", self.video)?;
        if let Some(res) = self.resolution {
            write!(f, " resolution: {};", res)?;
        }
        Ok(())
    }
}
