//! Device session: owns one opened device handle and applies the capture
//! configuration to it.

use log::info;

use super::errors::DeviceError;
use super::types::{DeviceHandle, DeviceOption, Frame, FrameSource};
use crate::config::{compression_description, CaptureConfig};

/// An opened device, configured and ready to read from.
///
/// The session applies configuration in a fixed order: compression first
/// (some backends reset format-dependent buffer sizing when the resolution
/// changes, so the format must be pinned before it), then FPS and
/// resolution, and finally an acquisition buffer depth of a single frame so
/// the driver never serves anything older than the most recent capture.
#[derive(Debug)]
pub struct DeviceSession<H: DeviceHandle> {
    handle: H,
    open: bool,
    next_seq: u64,
}

impl<H: DeviceHandle> DeviceSession<H> {
    /// Configure an already-opened handle and verify it reports ready.
    pub fn open(mut handle: H, config: &CaptureConfig) -> Result<Self, DeviceError> {
        if let Some(fourcc) = config.compression() {
            match compression_description(fourcc) {
                Some(desc) => info!("compression: {} ({})", fourcc, desc),
                None => info!("compression: {}", fourcc),
            }
            handle.set_option(DeviceOption::FourCc(fourcc.to_string()));
        }

        if let Some(fps) = config.fps() {
            handle.set_option(DeviceOption::Fps(fps));
        }

        if let Some(resolution) = config.resolution() {
            handle.set_option(DeviceOption::FrameWidth(resolution.width));
            handle.set_option(DeviceOption::FrameHeight(resolution.height));
        }

        if !handle.is_open() {
            handle.close();
            return Err(DeviceError::CannotOpen);
        }

        handle.set_option(DeviceOption::BufferSize(1));

        Ok(Self {
            handle,
            open: true,
            next_seq: 0,
        })
    }
}

impl<H: DeviceHandle> FrameSource for DeviceSession<H> {
    fn read(&mut self) -> Option<Frame> {
        if !self.open {
            return None;
        }
        let mut frame = self.handle.read()?;
        self.next_seq += 1;
        frame.seq = self.next_seq;
        Some(frame)
    }

    fn close(&mut self) {
        if self.open {
            self.handle.close();
            self.open = false;
        }
    }
}

impl<H: DeviceHandle> Drop for DeviceSession<H> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VideoSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fake driver handle that records the options applied to it.
    #[derive(Debug)]
    struct RecordingHandle {
        options: Vec<DeviceOption>,
        open: bool,
        frames_left: u32,
        closes: Arc<AtomicUsize>,
    }

    impl RecordingHandle {
        fn new(open: bool, frames_left: u32) -> Self {
            Self {
                options: Vec::new(),
                open,
                frames_left,
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl DeviceHandle for RecordingHandle {
        fn set_option(&mut self, option: DeviceOption) {
            self.options.push(option);
        }

        fn read(&mut self) -> Option<Frame> {
            if self.frames_left == 0 {
                return None;
            }
            self.frames_left -= 1;
            Some(Frame {
                data: vec![0; 4 * 2 * 3],
                width: 4,
                height: 2,
                channels: 3,
                seq: 0,
            })
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.open = false;
        }
    }

    fn full_config() -> CaptureConfig {
        let mut config = CaptureConfig::new(VideoSource::Index(0));
        config.set_resolution("640x480").unwrap();
        config
    }

    #[test]
    fn test_open_applies_compression_before_resolution() {
        // Build the config the way from_file does: compression + fps + resolution.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.toml");
        std::fs::write(
            &path,
            "video = 0\nresolution = \"640x480\"\nfps = 30.0\ncompression = \"mjpg\"\n",
        )
        .unwrap();
        let config = CaptureConfig::from_file(&path).unwrap();

        let handle = RecordingHandle::new(true, 0);
        let session = DeviceSession::open(handle, &config).unwrap();

        assert_eq!(
            session.handle.options,
            vec![
                DeviceOption::FourCc("MJPG".to_string()),
                DeviceOption::Fps(30.0),
                DeviceOption::FrameWidth(640),
                DeviceOption::FrameHeight(480),
                DeviceOption::BufferSize(1),
            ]
        );
    }

    #[test]
    fn test_open_fails_when_device_not_ready() {
        let handle = RecordingHandle::new(false, 0);
        let closes = Arc::clone(&handle.closes);
        let err = DeviceSession::open(handle, &full_config()).unwrap_err();
        assert!(matches!(err, DeviceError::CannotOpen));
        // The handle is released on the failure path
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_read_stamps_increasing_sequence() {
        let handle = RecordingHandle::new(true, 3);
        let mut session = DeviceSession::open(handle, &full_config()).unwrap();

        assert_eq!(session.read().unwrap().seq, 1);
        assert_eq!(session.read().unwrap().seq, 2);
        assert_eq!(session.read().unwrap().seq, 3);
        // Exhausted: a failed read is None, not a panic
        assert!(session.read().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let handle = RecordingHandle::new(true, 0);
        let closes = Arc::clone(&handle.closes);
        let mut session = DeviceSession::open(handle, &full_config()).unwrap();

        session.close();
        session.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(session.read().is_none());
    }

    #[test]
    fn test_drop_closes_the_handle() {
        let handle = RecordingHandle::new(true, 0);
        let closes = Arc::clone(&handle.closes);
        {
            let _session = DeviceSession::open(handle, &full_config()).unwrap();
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
