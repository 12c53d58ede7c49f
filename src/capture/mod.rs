//! Frame acquisition: device session, cropping, and threaded capture.
//!
//! The components here all speak the same [`FrameSource`] contract, so they
//! compose transparently:
//! [`DeviceSession`] -> optional [`CroppedCapture`] -> optional
//! [`ThreadedCapture`] -> consumer. [`open_capture`] builds that stack from a
//! resolved [`CaptureConfig`](crate::config::CaptureConfig).

mod cropped;
pub mod errors;
mod session;
mod threaded;
mod types;

pub use cropped::CroppedCapture;
pub use errors::{CaptureError, DeviceError, LifecycleError};
pub use session::DeviceSession;
pub use threaded::ThreadedCapture;
pub use types::{DeviceHandle, DeviceOption, Frame, FrameSource};

use log::info;

use crate::backend::{select_backend, Backend, SysInfo};
use crate::config::{CaptureConfig, VideoSource};

/// Open and configure the full capture stack for a resolved configuration.
///
/// `open_device` performs the driver-specific open of the video id with the
/// selected backend; everything after that is uniform: the session applies
/// the configuration, a crop wrapper is added when the config has a crop
/// rectangle, and a started [`ThreadedCapture`] is added when threading is
/// enabled (the default).
pub fn open_capture<H, F>(
    config: &CaptureConfig,
    open_device: F,
) -> Result<Box<dyn FrameSource + Send>, CaptureError>
where
    H: DeviceHandle + 'static,
    F: FnOnce(&VideoSource, Backend) -> Result<H, DeviceError>,
{
    info!("starting video capture: {}", config);

    let backend = select_backend(config.capture_mode(), &SysInfo::detect());
    info!("capture engine: {}", backend);

    let handle = open_device(config.video(), backend)?;
    let session = DeviceSession::open(handle, config)?;

    let mut source: Box<dyn FrameSource + Send> = Box::new(session);

    if let Some(rect) = config.crop() {
        source = Box::new(CroppedCapture::new(source, rect));
    }

    if config.threaded() {
        info!("capturing is threaded");
        let mut threaded = ThreadedCapture::new(source);
        threaded.start()?;
        source = Box::new(threaded);
    }

    // Probe read: logs the effective shape when a frame is already available
    // (with threading on, the first capture may not have landed yet).
    if let Some(frame) = source.read() {
        info!("capture started with shape: {:?}", frame.shape());
    }

    Ok(source)
}
