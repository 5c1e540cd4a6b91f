//! Cooperative cancellation for long-running codec loops.
//!
//! The LZW scan and the Huffman bit-packing loops are the only steps whose
//! duration grows with the input. They poll a [`Cancellation`] hook every
//! [`CANCEL_CHECK_INTERVAL`] iterations so a caller enforcing a timeout can
//! stop them without killing the thread.

use crate::error::{HzwError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of loop iterations between two cancellation polls.
pub const CANCEL_CHECK_INTERVAL: usize = 1 << 14;

/// A hook asked periodically whether the current operation should stop.
pub trait Cancellation: Send + Sync {
    /// Return `true` to abort the operation with [`HzwError::Cancelled`].
    fn is_cancelled(&self) -> bool;
}

/// A hook that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A shareable flag that cancels every operation polling it once set.
///
/// Clones share the same flag, so one clone can be handed to a worker and
/// another kept by the watchdog that calls [`CancelFlag::cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Cancellation for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl<F> Cancellation for F
where
    F: Fn() -> bool + Send + Sync,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        self()
    }
}

/// Rate-limited poller wrapping a [`Cancellation`] hook.
pub struct CancelPoller<'a> {
    hook: &'a dyn Cancellation,
    countdown: usize,
}

impl<'a> CancelPoller<'a> {
    /// Create a poller; the first poll happens after one full interval.
    pub fn new(hook: &'a dyn Cancellation) -> Self {
        Self {
            hook,
            countdown: CANCEL_CHECK_INTERVAL,
        }
    }

    /// Count one loop iteration, polling the hook when the interval elapses.
    #[inline]
    pub fn tick(&mut self) -> Result<()> {
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = CANCEL_CHECK_INTERVAL;
            return self.check();
        }
        Ok(())
    }

    /// Poll the hook immediately.
    pub fn check(&self) -> Result<()> {
        if self.hook.is_cancelled() {
            return Err(HzwError::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CancelPoller<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelPoller")
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}
