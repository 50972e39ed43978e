//! Persisting and summarising the search result.
//!
//! [`ResultReporter`] writes the winning panorama to disk and returns a
//! [`SearchSummary`] that renders both as human-readable text and as JSON.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::DynamicImage;
use serde_json::{Value, json};

use crate::error::PanoramaError;
use crate::search::SearchOutcome;

/// The parameters that produced the saved panorama.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    /// Where the panorama was written.
    pub output: PathBuf,
    /// Winning sampling step.
    pub step: u32,
    /// Winning number of frames.
    pub subset_size: usize,
    /// Stitch latency of the winning attempt.
    pub elapsed: Duration,
    /// Panorama dimensions as `(width, height)`.
    pub dimensions: (u32, u32),
    /// Total stitch attempts made during the search.
    pub attempts: usize,
    /// Whether the winner finished within the time budget.
    pub within_budget: bool,
}

impl SearchSummary {
    /// Machine-readable form of the summary.
    pub fn to_json(&self) -> Value {
        json!({
            "output": self.output.display().to_string(),
            "step": self.step,
            "frames": self.subset_size,
            "elapsed_seconds": self.elapsed.as_secs_f64(),
            "width": self.dimensions.0,
            "height": self.dimensions.1,
            "attempts": self.attempts,
            "within_budget": self.within_budget,
        })
    }
}

impl Display for SearchSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Best panorama saved to {}", self.output.display())?;
        write!(
            f,
            "   → step={}, frames={}, time={:.2}s ({}x{}, {} attempt(s))",
            self.step,
            self.subset_size,
            self.elapsed.as_secs_f64(),
            self.dimensions.0,
            self.dimensions.1,
            self.attempts
        )
    }
}

/// Writes the best panorama of a search to a file.
///
/// # Example
///
/// ```no_run
/// use panosweep::{CommandStitcher, PanoramaSearch, ResultReporter, SearchOptions, VideoFrameExtractor};
///
/// let options = SearchOptions::new();
/// let outcome = PanoramaSearch::new(options.clone())
///     .run(&mut VideoFrameExtractor::new("input.mp4"), &mut CommandStitcher::new("./stitch"))?;
/// let summary = ResultReporter::new("panorama.jpg").report(&outcome, options.time_budget())?;
/// println!("{summary}");
/// # Ok::<(), panosweep::PanoramaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ResultReporter {
    output: PathBuf,
    overwrite: bool,
}

impl ResultReporter {
    /// Create a reporter writing to `output`. The image format follows the
    /// file extension.
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Self {
            output: output.as_ref().to_path_buf(),
            overwrite: false,
        }
    }

    /// Allow replacing an existing file at the output path.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Where the panorama will be written.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Fail early if the output cannot be written without overwriting.
    ///
    /// # Errors
    ///
    /// Returns [`PanoramaError::OutputExists`] if the file exists and
    /// overwriting was not allowed.
    pub fn check_writable(&self) -> Result<(), PanoramaError> {
        if self.output.exists() && !self.overwrite {
            return Err(PanoramaError::OutputExists(self.output.clone()));
        }
        Ok(())
    }

    /// Save the winning panorama and summarise it.
    ///
    /// `time_budget` is only used to fill [`SearchSummary::within_budget`].
    ///
    /// # Errors
    ///
    /// [`PanoramaError::NoResultFound`] if the search found nothing,
    /// [`PanoramaError::OutputExists`] if the file exists and overwriting is
    /// off, or an I/O / image error from writing the file.
    pub fn report(
        &self,
        outcome: &SearchOutcome,
        time_budget: Duration,
    ) -> Result<SearchSummary, PanoramaError> {
        let best = outcome.best.as_ref().ok_or(PanoramaError::NoResultFound)?;
        self.check_writable()?;

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        save_panorama(&best.panorama, &self.output)?;
        log::info!("Saved panorama to {}", self.output.display());

        Ok(SearchSummary {
            output: self.output.clone(),
            step: best.step,
            subset_size: best.subset_size,
            elapsed: best.elapsed,
            dimensions: (best.panorama.width(), best.panorama.height()),
            attempts: outcome.attempts.len(),
            within_budget: best.within_budget(time_budget),
        })
    }
}

/// Save `panorama`, dropping the alpha channel for formats that cannot hold
/// one.
fn save_panorama(panorama: &DynamicImage, path: &Path) -> Result<(), PanoramaError> {
    let is_jpeg = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("jpg") || extension.eq_ignore_ascii_case("jpeg")
        });

    if is_jpeg && panorama.color().has_alpha() {
        DynamicImage::ImageRgb8(panorama.to_rgb8()).save(path)?;
    } else {
        panorama.save(path)?;
    }
    Ok(())
}
