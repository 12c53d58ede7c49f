//! Frame data and the capability traits the capture wrappers compose over.

/// A captured frame: a rectangular pixel buffer plus a monotonically
/// increasing sequence number stamped by the device session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw pixel data, `height` rows of `width * channels` bytes.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Bytes per pixel.
    pub channels: u8,
    /// Capture sequence number; strictly increasing per session.
    pub seq: u64,
}

impl Frame {
    /// (height, width, channels), the conventional image-buffer shape.
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.height, self.width, self.channels)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.channels as usize
    }
}

/// Anything that produces frames.
///
/// `read()` returning `None` signals a failed read (device hiccup, end of
/// stream, or no frame published yet) without raising; callers choose to
/// retry, tolerate, or abort. All capture wrappers implement this, so
/// wrapping is composable and transparent to the consumer.
pub trait FrameSource {
    /// Pull the next frame, or `None` on a failed read.
    fn read(&mut self) -> Option<Frame>;

    /// Release the underlying resources. Idempotent.
    fn close(&mut self);
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read(&mut self) -> Option<Frame> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Options applied to an opened device before capture starts.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceOption {
    /// Pixel/compression format as a FourCC code.
    FourCc(String),
    /// Target frames per second.
    Fps(f64),
    /// Requested frame width in pixels.
    FrameWidth(u32),
    /// Requested frame height in pixels.
    FrameHeight(u32),
    /// Internal acquisition buffer depth, in frames.
    BufferSize(u32),
}

/// The opaque driver handle behind the capture layer.
///
/// Implementations wrap whatever driver API actually captures pixel data;
/// this crate never touches one directly. Opening is performed by an opener
/// callable `(VideoSource, Backend) -> Result<H, DeviceError>` supplied to
/// [`crate::capture::open_capture`].
pub trait DeviceHandle: Send {
    /// Apply a device option. Drivers ignore options they do not support.
    fn set_option(&mut self, option: DeviceOption);

    /// Capture the next frame synchronously, or `None` on failure.
    fn read(&mut self) -> Option<Frame>;

    /// Whether the device reports itself opened and ready.
    fn is_open(&self) -> bool;

    /// Release the device. Idempotent.
    fn close(&mut self);
}
