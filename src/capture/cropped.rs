//! Cropping wrapper: applies a normalized rectangle to every frame read
//! from the wrapped source.

use super::types::{Frame, FrameSource};
use crate::config::CropRect;

/// Wraps any frame source and crops each frame to a normalized rectangle.
///
/// Stateless across calls: failed reads pass through untouched, successful
/// reads are cropped to `round(fraction * extent)` pixel bounds.
pub struct CroppedCapture<S> {
    inner: S,
    rect: CropRect,
}

impl<S: FrameSource> CroppedCapture<S> {
    pub fn new(inner: S, rect: CropRect) -> Self {
        Self { inner, rect }
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }
}

impl<S: FrameSource> FrameSource for CroppedCapture<S> {
    fn read(&mut self) -> Option<Frame> {
        self.inner.read().map(|frame| crop_frame(frame, self.rect))
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

fn crop_frame(frame: Frame, rect: CropRect) -> Frame {
    let (x, y) = rect.pixel_bounds(frame.width, frame.height);
    let bpp = frame.bytes_per_pixel();
    let row_stride = frame.width as usize * bpp;

    let out_width = x.len();
    let out_height = y.len();
    let mut data = Vec::with_capacity(out_width * out_height * bpp);
    for row in y {
        let start = row * row_stride + x.start * bpp;
        let end = row * row_stride + x.end * bpp;
        data.extend_from_slice(&frame.data[start..end]);
    }

    Frame {
        data,
        width: out_width as u32,
        height: out_height as u32,
        ..frame
    }
}
