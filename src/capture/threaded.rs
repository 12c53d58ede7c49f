//! Threaded wrapper: decouples device acquisition from consumer reads.
//!
//! A background thread owns the wrapped source exclusively and keeps
//! overwriting a single-slot latest-frame buffer; the consumer reads the
//! slot without ever blocking on device I/O. Freshness is guaranteed over
//! completeness: frames the consumer never sees are dropped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::errors::LifecycleError;
use super::types::{Frame, FrameSource};

/// Runs the wrapped source's acquisition in a background thread and serves
/// the most recently captured frame.
///
/// Lifecycle is `Created -> Running -> Stopped`, driven by [`start`] and
/// [`stop`]; `Stopped` is terminal. After [`stop`] the device is never
/// touched again; `read()` keeps returning the last published frame.
///
/// [`start`]: ThreadedCapture::start
/// [`stop`]: ThreadedCapture::stop
pub struct ThreadedCapture {
    /// Latest captured frame, shared with the acquisition thread.
    slot: Arc<Mutex<Option<Frame>>>,
    /// Signal for the acquisition loop to exit.
    running: Arc<AtomicBool>,
    /// Acquisition thread handle.
    worker: Option<JoinHandle<()>>,
    /// The wrapped source, until `start()` hands it to the thread.
    source: Option<Box<dyn FrameSource + Send>>,
    stopped: bool,
}

impl ThreadedCapture {
    pub fn new(source: Box<dyn FrameSource + Send>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            source: Some(source),
            stopped: false,
        }
    }

    /// Launch the background acquisition loop.
    ///
    /// The loop repeatedly reads the wrapped source and swaps successful
    /// frames into the slot, overwriting whatever the consumer has not
    /// picked up. Failed reads leave the slot untouched and are retried on
    /// the next iteration; the loop cadence is bound by the device's own
    /// blocking read, so there is no extra backoff.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        if self.stopped {
            return Err(LifecycleError::AlreadyStopped);
        }
        let Some(mut source) = self.source.take() else {
            return Err(LifecycleError::AlreadyStarted);
        };

        self.running.store(true, Ordering::SeqCst);
        let slot = Arc::clone(&self.slot);
        let running = Arc::clone(&self.running);

        self.worker = Some(std::thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                // No lock is held around the device read, only around the swap.
                if let Some(frame) = source.read() {
                    if let Ok(mut latest) = slot.lock() {
                        *latest = Some(frame);
                    }
                }
            }
            source.close();
        }));

        Ok(())
    }

    /// Signal the acquisition loop to exit and wait for it to terminate.
    ///
    /// The loop closes the wrapped source before exiting, so when this
    /// returns the device has been released and is guaranteed not to be
    /// touched by two threads during teardown. Blocks without timeout;
    /// idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
        self.stopped = true;
    }

    /// Whether the acquisition thread is currently running.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl FrameSource for ThreadedCapture {
    /// Return the latest captured frame without touching the device.
    ///
    /// `None` only before the first successful capture. At most a brief
    /// mutual-exclusion wait for the slot swap, never device latency.
    fn read(&mut self) -> Option<Frame> {
        self.slot.lock().map(|latest| latest.clone()).unwrap_or(None)
    }

    fn close(&mut self) {
        self.stop();
    }
}

impl Drop for ThreadedCapture {
    fn drop(&mut self) {
        self.stop();
        // Never started: release the wrapped source directly.
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}
