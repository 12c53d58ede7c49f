//! calib-capture: the frame-acquisition layer of the camera-calibration
//! pipeline.
//!
//! Configuration resolution ([`config`]), backend selection ([`backend`]),
//! and the composable capture stack ([`capture`]): device session, optional
//! crop, optional threaded latest-frame buffering. The device driver itself
//! stays behind the [`capture::DeviceHandle`] trait.

pub mod backend;
pub mod capture;
pub mod cli;
pub mod config;
