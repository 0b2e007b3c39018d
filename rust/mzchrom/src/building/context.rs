use crate::errors::MzChromError;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    AtomicU64,
    Ordering,
};

/// Progress and cancellation state of one run.
///
/// Cloning shares the state, so a clone can be handed to another thread
/// to watch the progress or cancel the run.
///
/// ```
/// use mzchrom::RunContext;
///
/// let ctx = RunContext::new();
/// let watcher = ctx.clone();
/// assert_eq!(watcher.progress(), 0.0);
/// watcher.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>,
    // Bits of a non-negative f64, which order the same way as the value.
    progress: Arc<AtomicU64>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn check_cancelled(&self) -> Result<(), MzChromError> {
        if self.is_cancelled() {
            Err(MzChromError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Fraction of the run done so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress.load(Ordering::Relaxed))
    }

    /// Moves the progress forward, never backwards.
    pub(crate) fn advance_to(&self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.progress
            .fetch_max(fraction.to_bits(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic() {
        let ctx = RunContext::new();
        ctx.advance_to(0.25);
        ctx.advance_to(0.1);
        assert_eq!(ctx.progress(), 0.25);
        ctx.advance_to(2.0);
        assert_eq!(ctx.progress(), 1.0);
    }

    #[test]
    fn test_cancel_is_shared() {
        let ctx = RunContext::new();
        assert!(ctx.check_cancelled().is_ok());
        let other = ctx.clone();
        std::thread::spawn(move || other.cancel()).join().unwrap();
        assert!(matches!(ctx.check_cancelled(), Err(MzChromError::Cancelled)));
    }
}
