//! Progress reporting for batch rendering.
//!
//! Renderers call a [`ProgressCallback`] every few conversations so callers
//! can show "Processed 20/143 conversations..." style updates.
//!
//! # Example
//!
//! ```rust
//! use convopack::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!("Processed {}/{} conversations...", progress.processed, progress.total);
//! });
//!
//! callback(Progress::new(10, 143));
//! ```

use std::sync::Arc;

/// How far a batch has come.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Conversations handled so far.
    pub processed: usize,

    /// Conversations in the batch.
    pub total: usize,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// An empty batch counts as complete.
    ///
    /// ```rust
    /// use convopack::progress::Progress;
    ///
    /// assert_eq!(Progress::new(5, 10).percentage(), 50.0);
    /// assert_eq!(Progress::new(0, 0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.processed as f64 / self.total as f64) * 100.0
        }
    }

    /// Returns whether the batch is complete.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints to stderr.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        eprintln!(
            "Processed {}/{} conversations...",
            progress.processed, progress.total
        );
    })
}

/// Whether a batch at position `processed` (1-based) should report.
///
/// Reports every `every` items; `every == 0` disables reporting.
pub(crate) fn should_report(processed: usize, every: usize) -> bool {
    every != 0 && processed % every == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert!((Progress::new(25, 100).percentage() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_empty_batch() {
        let progress = Progress::new(0, 0);
        assert!((progress.percentage() - 100.0).abs() < f64::EPSILON);
        assert!(progress.is_complete());
    }

    #[test]
    fn test_progress_is_complete() {
        assert!(Progress::new(10, 10).is_complete());
        assert!(!Progress::new(9, 10).is_complete());
    }

    #[test]
    fn test_should_report() {
        assert!(should_report(10, 10));
        assert!(should_report(20, 10));
        assert!(!should_report(11, 10));
        assert!(!should_report(10, 0));
    }

    #[test]
    fn test_no_progress_callback() {
        let callback = no_progress();
        callback(Progress::default());
    }

    #[test]
    fn test_progress_callback_type() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let callback: ProgressCallback = Arc::new(move |progress| {
            counter_clone.store(progress.processed, Ordering::SeqCst);
        });

        callback(Progress::new(42, 100));
        assert_eq!(counter.load(Ordering::SeqCst), 42);
    }
}
