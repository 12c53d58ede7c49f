//! Error types for capture operations.
//!
//! Failed reads are not errors: they are `None` returns on
//! [`crate::capture::FrameSource::read`] so callers can retry or tolerate
//! them. The types here cover device startup and lifecycle misuse, both of
//! which are fatal to acquisition startup.

use thiserror::Error;

use crate::config::ConfigError;

/// The device failed to open or report ready.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open capture")]
    CannotOpen,
}

/// An invalid capture lifecycle transition.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("capture thread already started")]
    AlreadyStarted,
    #[error("capture thread already stopped")]
    AlreadyStopped,
}

/// Any error that can abort acquisition startup.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
