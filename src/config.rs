//! Search configuration.
//!
//! [`SearchOptions`] is a builder that carries the schedule bounds, the time
//! budget, the pre-stitch scale factor and an optional progress callback into
//! [`PanoramaSearch`](crate::PanoramaSearch).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use panosweep::SearchOptions;
//!
//! let options = SearchOptions::new()
//!     .with_max_step(16)
//!     .with_growth_factor(2.0)
//!     .with_time_budget(Duration::from_millis(1500))
//!     .with_scale(0.25);
//! assert!(options.validate().is_ok());
//! assert_eq!(options.step_values(), vec![2, 4, 8, 16]);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::time::Duration;

use crate::error::PanoramaError;
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::schedule::{StepSchedule, SubsetSchedule};

/// Default latency threshold for a single stitch attempt.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(1);

/// Default resize factor applied to frames before stitching.
pub const DEFAULT_SCALE: f64 = 0.5;

/// Parameters of a panorama search.
///
/// Defaults: steps 2 to 10 growing by 1.5, subsets from 4 frames in
/// increments of 2, a one second budget per stitch, and frames halved
/// before stitching.
#[derive(Clone)]
#[must_use]
pub struct SearchOptions {
    pub(crate) step_schedule: StepSchedule,
    pub(crate) subset_schedule: SubsetSchedule,
    pub(crate) time_budget: Duration,
    pub(crate) scale: f64,
    /// Extractions shorter than this skip the step entirely.
    pub(crate) min_extracted_frames: usize,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for SearchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SearchOptions")
            .field("step_schedule", &self.step_schedule)
            .field("subset_schedule", &self.subset_schedule)
            .field("time_budget", &self.time_budget)
            .field("scale", &self.scale)
            .field("min_extracted_frames", &self.min_extracted_frames)
            .finish_non_exhaustive()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            step_schedule: StepSchedule::default(),
            subset_schedule: SubsetSchedule::default(),
            time_budget: DEFAULT_TIME_BUDGET,
            scale: DEFAULT_SCALE,
            min_extracted_frames: 2,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the first sampling step.
    pub fn with_min_step(mut self, step: u32) -> Self {
        self.step_schedule.min_step = step;
        self
    }

    /// Set the largest sampling step (inclusive).
    pub fn with_max_step(mut self, step: u32) -> Self {
        self.step_schedule.max_step = step;
        self
    }

    /// Set the geometric growth factor between steps.
    pub fn with_growth_factor(mut self, factor: f64) -> Self {
        self.step_schedule.growth_factor = factor;
        self
    }

    /// Replace the whole step schedule.
    pub fn with_step_schedule(mut self, schedule: StepSchedule) -> Self {
        self.step_schedule = schedule;
        self
    }

    /// Set the smallest subset size tried per step.
    pub fn with_subset_floor(mut self, floor: usize) -> Self {
        self.subset_schedule.floor = floor;
        self
    }

    /// Set the distance between consecutive subset sizes.
    pub fn with_subset_increment(mut self, increment: usize) -> Self {
        self.subset_schedule.increment = increment;
        self
    }

    /// Set the latency threshold used by both the cutoff and the early stop.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the factor frames are resized by before stitching.
    ///
    /// `1.0` keeps the decoded resolution.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the minimum number of extracted frames for a step to be explored.
    pub fn with_min_extracted_frames(mut self, count: usize) -> Self {
        self.min_extracted_frames = count;
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The step schedule in effect.
    pub fn step_schedule(&self) -> StepSchedule {
        self.step_schedule
    }

    /// The subset schedule in effect.
    pub fn subset_schedule(&self) -> SubsetSchedule {
        self.subset_schedule
    }

    /// The latency threshold in effect.
    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// The pre-stitch scale factor in effect.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Step values the search will visit, in order.
    pub fn step_values(&self) -> Vec<u32> {
        self.step_schedule.values()
    }

    /// Check that the options can drive a search.
    ///
    /// # Errors
    ///
    /// Returns [`PanoramaError::InvalidConfiguration`] when the step schedule
    /// is empty, the scale or time budget is not positive, or the subset
    /// floor or increment is zero.
    pub fn validate(&self) -> Result<(), PanoramaError> {
        let steps = self.step_schedule;
        if steps.is_empty() {
            return Err(PanoramaError::InvalidConfiguration(format!(
                "step schedule is empty (min_step={}, max_step={}, growth_factor={}); \
                 need 0 < min_step <= max_step and growth_factor > 1",
                steps.min_step, steps.max_step, steps.growth_factor
            )));
        }

        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PanoramaError::InvalidConfiguration(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }

        if self.time_budget.is_zero() {
            return Err(PanoramaError::InvalidConfiguration(
                "time budget must be greater than zero".to_string(),
            ));
        }

        if self.subset_schedule.floor == 0 {
            return Err(PanoramaError::InvalidConfiguration(
                "subset floor must be at least 1".to_string(),
            ));
        }

        if self.subset_schedule.increment == 0 {
            return Err(PanoramaError::InvalidConfiguration(
                "subset increment must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
