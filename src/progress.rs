//! Progress reporting for the parameter search.
//!
//! This module provides [`ProgressCallback`] for observing a running search
//! and [`ProgressInfo`] for the snapshot delivered at each event.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use panosweep::{ProgressCallback, ProgressInfo, SearchOptions, SearchPhase};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if info.phase == SearchPhase::AttemptFinished {
//!             println!("step={} n={:?} ok={:?}", info.step, info.subset_size, info.succeeded);
//!         }
//!     }
//! }
//!
//! let options = SearchOptions::new().with_progress(Arc::new(PrintProgress));
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::search::StitchAttempt;

/// The point of the search a [`ProgressInfo`] was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchPhase {
    /// A new step value was selected; frames are about to be extracted.
    StepStarted,
    /// Frames for the current step were extracted.
    FramesExtracted,
    /// A stitch attempt returned and was evaluated.
    AttemptFinished,
    /// The search loop ended.
    SearchFinished,
}

/// A snapshot of search progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Which event produced this snapshot.
    pub phase: SearchPhase,
    /// The step value being explored (the last one for `SearchFinished`).
    pub step: u32,
    /// Frames extracted for the current step, once known.
    pub extracted: Option<usize>,
    /// Subset size of the attempt that just finished.
    pub subset_size: Option<usize>,
    /// Whether that attempt succeeded.
    pub succeeded: Option<bool>,
    /// Stitch latency of that attempt.
    pub attempt_elapsed: Option<Duration>,
    /// Number of stitch attempts made so far.
    pub attempts: u64,
    /// Subset size of the current best result, if any.
    pub best_subset_size: Option<usize>,
    /// Clock time elapsed since the search started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates during a search.
///
/// Callbacks observe but cannot steer the search.
pub trait ProgressCallback: Send + Sync {
    /// Called at every search event.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that accumulates counters and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    started_at: Duration,
    attempts: u64,
    best_subset_size: Option<usize>,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, started_at: Duration) -> Self {
        Self {
            callback,
            started_at,
            attempts: 0,
            best_subset_size: None,
        }
    }

    pub(crate) fn step_started(&self, step: u32, now: Duration) {
        self.emit(self.snapshot(SearchPhase::StepStarted, step, now));
    }

    pub(crate) fn frames_extracted(&self, step: u32, extracted: usize, now: Duration) {
        let mut info = self.snapshot(SearchPhase::FramesExtracted, step, now);
        info.extracted = Some(extracted);
        self.emit(info);
    }

    /// Record one evaluated attempt. `best_subset_size` is the incumbent
    /// after the selection rule ran.
    pub(crate) fn attempt_finished(
        &mut self,
        attempt: &StitchAttempt,
        extracted: usize,
        best_subset_size: Option<usize>,
        now: Duration,
    ) {
        self.attempts += 1;
        self.best_subset_size = best_subset_size;

        let mut info = self.snapshot(SearchPhase::AttemptFinished, attempt.step, now);
        info.extracted = Some(extracted);
        info.subset_size = Some(attempt.subset_size);
        info.succeeded = Some(attempt.succeeded());
        info.attempt_elapsed = Some(attempt.elapsed);
        self.emit(info);
    }

    pub(crate) fn finish(&self, last_step: u32, now: Duration) {
        self.emit(self.snapshot(SearchPhase::SearchFinished, last_step, now));
    }

    fn snapshot(&self, phase: SearchPhase, step: u32, now: Duration) -> ProgressInfo {
        ProgressInfo {
            phase,
            step,
            extracted: None,
            subset_size: None,
            succeeded: None,
            attempt_elapsed: None,
            attempts: self.attempts,
            best_subset_size: self.best_subset_size,
            elapsed: now.saturating_sub(self.started_at),
        }
    }

    fn emit(&self, info: ProgressInfo) {
        self.callback.on_progress(&info);
    }
}
