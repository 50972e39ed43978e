//! The adaptive parameter search.
//!
//! [`PanoramaSearch`] walks the step schedule, extracts frames for each step,
//! and stitches growing prefixes of those frames while timing every call. Two
//! latency rules shape the walk:
//!
//! - **Cutoff**: an attempt slower than the time budget ends the current step;
//!   larger subsets of the same step are not tried.
//! - **Early stop**: once the best result was produced within the budget, no
//!   further steps are tried.
//!
//! The best result is the successful attempt with the largest subset size.
//! Selection runs before the cutoff check, so a successful attempt that blew
//! the budget can still become the best result while ending its step.
//!
//! # Example
//!
//! ```no_run
//! use panosweep::{CommandStitcher, PanoramaSearch, SearchOptions, VideoFrameExtractor};
//!
//! let mut extractor = VideoFrameExtractor::new("drone.mp4");
//! let mut stitcher = CommandStitcher::new("./stitch");
//! let outcome = PanoramaSearch::new(SearchOptions::new()).run(&mut extractor, &mut stitcher)?;
//!
//! if let Some(best) = &outcome.best {
//!     println!("step={} frames={} time={:.2?}", best.step, best.subset_size, best.elapsed);
//! }
//! # Ok::<(), panosweep::PanoramaError>(())
//! ```

use std::time::Duration;

use image::DynamicImage;

use crate::{
    clock::{Clock, SystemClock},
    config::SearchOptions,
    error::PanoramaError,
    frames::FrameExtractor,
    progress::ProgressTracker,
    stitch::StitchingEngine,
};

/// One timed `(step, n)` stitch trial.
///
/// The panorama itself is not kept here; only a winning attempt's image is
/// retained, in [`BestResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchAttempt {
    /// Sampling step the frames were extracted with.
    pub step: u32,
    /// Number of leading frames handed to the stitcher.
    pub subset_size: usize,
    /// Wall-clock time spent inside the stitcher.
    pub elapsed: Duration,
    /// Why the stitch failed, or `None` on success.
    pub failure: Option<String>,
}

impl StitchAttempt {
    /// Returns `true` if the stitcher produced a panorama.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// The retained winner of a search.
#[derive(Debug, Clone)]
pub struct BestResult {
    /// The stitched panorama.
    pub panorama: DynamicImage,
    /// Sampling step that produced it.
    pub step: u32,
    /// Number of frames stitched.
    pub subset_size: usize,
    /// Stitch latency of the winning attempt.
    pub elapsed: Duration,
}

impl BestResult {
    /// Returns `true` if the winning attempt finished within `budget`.
    pub fn within_budget(&self, budget: Duration) -> bool {
        self.elapsed <= budget
    }
}

/// What happened at one step of the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The sampling step.
    pub step: u32,
    /// How many frames the extractor returned (0 on extraction failure).
    pub extracted: usize,
    /// How many stitch attempts were made at this step.
    pub attempted: usize,
    /// Subset size whose latency ended the step, if the cutoff fired.
    pub cutoff_at: Option<usize>,
}

/// Why the search loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A best result within the time budget existed after this step.
    EarlyStop {
        /// The last step explored.
        step: u32,
    },
    /// Every step of the schedule was explored.
    StepsExhausted,
}

/// Everything a finished search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The winning attempt, if any stitch succeeded.
    pub best: Option<BestResult>,
    /// Every attempt, in the order it was made.
    pub attempts: Vec<StitchAttempt>,
    /// Every explored step, in order.
    pub steps: Vec<StepRecord>,
    /// Why the loop ended.
    pub stop_reason: StopReason,
}

impl SearchOutcome {
    /// Returns `true` if a panorama was found.
    pub fn is_success(&self) -> bool {
        self.best.is_some()
    }

    /// The step values that were explored, in order.
    pub fn steps_tried(&self) -> Vec<u32> {
        self.steps.iter().map(|record| record.step).collect()
    }

    /// Take the winner out of the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`PanoramaError::NoResultFound`] if no stitch succeeded.
    pub fn into_best(self) -> Result<BestResult, PanoramaError> {
        self.best.ok_or(PanoramaError::NoResultFound)
    }
}

/// Mutable state threaded through one run.
struct SearchState {
    best: Option<BestResult>,
    attempts: Vec<StitchAttempt>,
    steps: Vec<StepRecord>,
    tracker: ProgressTracker,
}

/// Drives the two-level search over sampling steps and subset sizes.
///
/// The controller is strictly sequential: each extraction and stitch call
/// blocks until it returns, and latency is measured after the fact with the
/// controller's [`Clock`].
#[derive(Debug, Clone)]
pub struct PanoramaSearch<C: Clock = SystemClock> {
    options: SearchOptions,
    clock: C,
}

impl PanoramaSearch<SystemClock> {
    /// Create a search that measures latency with the system clock.
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            clock: SystemClock::new(),
        }
    }
}

impl<C: Clock> PanoramaSearch<C> {
    /// Create a search that measures latency with `clock`.
    pub fn with_clock(options: SearchOptions, clock: C) -> Self {
        Self { options, clock }
    }

    /// The options this search runs with.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Run the search to completion.
    ///
    /// Extraction and stitch failures are logged and absorbed; the search
    /// only fails up front on unusable options. An empty
    /// [`SearchOutcome::best`] means no panorama was found.
    ///
    /// # Errors
    ///
    /// Returns [`PanoramaError::InvalidConfiguration`] if the options do not
    /// validate. No collaborator is called in that case.
    pub fn run<E, S>(&self, extractor: &mut E, engine: &mut S) -> Result<SearchOutcome, PanoramaError>
    where
        E: FrameExtractor + ?Sized,
        S: StitchingEngine + ?Sized,
    {
        self.options.validate()?;

        let step_values = self.options.step_values();
        let budget = self.options.time_budget;
        log::info!(
            "Steps to try: {:?} (time budget {:.2}s)",
            step_values,
            budget.as_secs_f64()
        );

        let mut state = SearchState {
            best: None,
            attempts: Vec::new(),
            steps: Vec::with_capacity(step_values.len()),
            tracker: ProgressTracker::new(self.options.progress.clone(), self.clock.now()),
        };
        let mut stop_reason = StopReason::StepsExhausted;
        let mut last_step = 0;

        for step in step_values {
            last_step = step;
            state.tracker.step_started(step, self.clock.now());

            let record = self.explore_step(step, extractor, engine, &mut state);
            state.steps.push(record);

            if let Some(best) = state.best.as_ref().filter(|best| best.within_budget(budget)) {
                log::info!(
                    "Best result (step={}, frames={}, {:.2}s) is within budget; stopping after step {}",
                    best.step,
                    best.subset_size,
                    best.elapsed.as_secs_f64(),
                    step
                );
                stop_reason = StopReason::EarlyStop { step };
                break;
            }
        }

        state.tracker.finish(last_step, self.clock.now());

        match &state.best {
            Some(best) => log::info!(
                "Search finished after {} attempt(s): step={}, frames={}, time={:.2}s",
                state.attempts.len(),
                best.step,
                best.subset_size,
                best.elapsed.as_secs_f64()
            ),
            None => log::warn!(
                "Search finished after {} attempt(s) without a panorama",
                state.attempts.len()
            ),
        }

        Ok(SearchOutcome {
            best: state.best,
            attempts: state.attempts,
            steps: state.steps,
            stop_reason,
        })
    }

    /// Extract frames for `step` and stitch growing prefixes of them.
    ///
    /// The extracted frames are dropped when this returns, on every path.
    fn explore_step<E, S>(
        &self,
        step: u32,
        extractor: &mut E,
        engine: &mut S,
        state: &mut SearchState,
    ) -> StepRecord
    where
        E: FrameExtractor + ?Sized,
        S: StitchingEngine + ?Sized,
    {
        let frames = match extractor.extract(step) {
            Ok(frames) => frames,
            Err(error) => {
                log::warn!("Extraction failed for step={step}: {error}");
                Vec::new()
            }
        };
        let extracted = frames.len();
        state
            .tracker
            .frames_extracted(step, extracted, self.clock.now());

        let mut record = StepRecord {
            step,
            extracted,
            attempted: 0,
            cutoff_at: None,
        };

        if extracted < self.options.min_extracted_frames {
            log::warn!(
                "{}",
                PanoramaError::InsufficientFrames { step, extracted }
            );
            return record;
        }

        let subset_sizes = self.options.subset_schedule.sizes(extracted);
        if subset_sizes.is_empty() {
            log::info!(
                "Step {step}: {extracted} frame(s) is below the subset floor of {}; skipping",
                self.options.subset_schedule.floor
            );
            return record;
        }

        let frames = crate::utilities::scale_frames(frames, self.options.scale);
        let budget = self.options.time_budget;

        for subset_size in subset_sizes {
            log::debug!("Trying step={step}, frames={subset_size}");

            let started = self.clock.now();
            let result = engine.stitch(&frames[..subset_size]);
            let elapsed = self.clock.now().saturating_sub(started);

            let attempt = StitchAttempt {
                step,
                subset_size,
                elapsed,
                failure: result.as_ref().err().map(ToString::to_string),
            };

            match result {
                Ok(panorama) => {
                    log::info!(
                        "Success with {} frames in {:.2}s",
                        subset_size,
                        elapsed.as_secs_f64()
                    );
                    let improves = state
                        .best
                        .as_ref()
                        .is_none_or(|best| subset_size > best.subset_size);
                    if improves {
                        state.best = Some(BestResult {
                            panorama,
                            step,
                            subset_size,
                            elapsed,
                        });
                    }
                }
                Err(error) => {
                    log::warn!("Stitch failed for step={step}, frames={subset_size}: {error}");
                }
            }

            let best_subset_size = state.best.as_ref().map(|best| best.subset_size);
            state
                .tracker
                .attempt_finished(&attempt, extracted, best_subset_size, self.clock.now());
            state.attempts.push(attempt);
            record.attempted += 1;

            if elapsed > budget {
                log::info!(
                    "Stitching took {:.2}s > {:.2}s; no larger subsets for step {}",
                    elapsed.as_secs_f64(),
                    budget.as_secs_f64(),
                    step
                );
                record.cutoff_at = Some(subset_size);
                break;
            }
        }

        log::debug!("Released {} frame(s) for step {}", frames.len(), step);
        record
    }
}
