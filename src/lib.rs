//! # panosweep
//!
//! Find the largest set of video frames that still stitches into a panorama
//! within a latency budget.
//!
//! `panosweep` samples a video at a geometric series of steps, stitches
//! growing prefixes of each sample with an external stitcher, and keeps the
//! successful attempt with the most frames. Each stitch is timed: an attempt
//! over budget ends its step, and a winner within budget ends the search.
//!
//! Frame extraction and stitching are ports ([`FrameExtractor`],
//! [`StitchingEngine`]). The crate ships an FFmpeg-backed extractor
//! ([`VideoFrameExtractor`], via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next)) and a stitcher that
//! shells out to any program ([`CommandStitcher`]); anything implementing the
//! traits, closures included, can stand in.
//!
//! ## Quick Start
//!
//! ```no_run
//! use panosweep::{
//!     CommandStitcher, PanoramaSearch, ResultReporter, SearchOptions, VideoFrameExtractor,
//! };
//!
//! let options = SearchOptions::new();
//! let mut extractor = VideoFrameExtractor::new("drone.mp4");
//! let mut stitcher = CommandStitcher::new("python3").with_arg("stitch.py");
//!
//! let outcome = PanoramaSearch::new(options.clone()).run(&mut extractor, &mut stitcher)?;
//! let summary = ResultReporter::new("panorama.jpg").report(&outcome, options.time_budget())?;
//! println!("{summary}");
//! # Ok::<(), panosweep::PanoramaError>(())
//! ```
//!
//! ## Deterministic searches
//!
//! Latency is read from a [`Clock`]. Pairing [`ManualClock`] with closure
//! collaborators replays a search exactly:
//!
//! ```
//! use std::time::Duration;
//!
//! use image::{DynamicImage, RgbImage};
//! use panosweep::{ManualClock, PanoramaError, PanoramaSearch, SearchOptions};
//!
//! let clock = ManualClock::new();
//! let ticker = clock.clone();
//!
//! let mut extractor = |_step: u32| -> Result<Vec<DynamicImage>, PanoramaError> {
//!     Ok(vec![DynamicImage::ImageRgb8(RgbImage::new(8, 8)); 12])
//! };
//! let mut stitcher = move |frames: &[DynamicImage]| -> Result<DynamicImage, PanoramaError> {
//!     ticker.advance(Duration::from_millis(200));
//!     Ok(frames[0].clone())
//! };
//!
//! let outcome = PanoramaSearch::with_clock(SearchOptions::new().with_scale(1.0), clock)
//!     .run(&mut extractor, &mut stitcher)?;
//! assert_eq!(outcome.best.map(|best| best.subset_size), Some(12));
//! # Ok::<(), PanoramaError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed to build the crate.

pub mod clock;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod frames;
pub mod progress;
pub mod report;
pub mod schedule;
pub mod search;
pub mod stitch;
mod utilities;
pub mod video;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_SCALE, DEFAULT_TIME_BUDGET, SearchOptions};
pub use error::PanoramaError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frames::FrameExtractor;
pub use progress::{ProgressCallback, ProgressInfo, SearchPhase};
pub use report::{ResultReporter, SearchSummary};
pub use schedule::{StepSchedule, SubsetSchedule};
pub use search::{BestResult, PanoramaSearch, SearchOutcome, StepRecord, StitchAttempt, StopReason};
pub use stitch::{CommandStitcher, StitchingEngine};
pub use utilities::{scale_frames, scaled_dimensions};
pub use video::VideoFrameExtractor;
