//! The frame extraction port.
//!
//! The search controller only needs an ordered sequence of decoded frames for
//! a given sampling step. [`FrameExtractor`] is that contract;
//! [`VideoFrameExtractor`](crate::VideoFrameExtractor) fulfils it with FFmpeg
//! and tests fulfil it with closures.

use image::DynamicImage;

use crate::error::PanoramaError;

/// Produces the frames of a source sampled at a given step.
///
/// `extract(step)` returns every `step`-th frame in decode order, starting
/// with the first. Each call is an independent pass over the source; nothing
/// is expected to survive from one call to the next.
pub trait FrameExtractor {
    /// Extract frames spaced `step` apart.
    ///
    /// # Errors
    ///
    /// [`PanoramaError::SourceUnavailable`] when the source cannot be opened,
    /// or any decoding error. The search treats every error as an empty
    /// extraction for that step.
    fn extract(&mut self, step: u32) -> Result<Vec<DynamicImage>, PanoramaError>;
}

impl<F> FrameExtractor for F
where
    F: FnMut(u32) -> Result<Vec<DynamicImage>, PanoramaError>,
{
    fn extract(&mut self, step: u32) -> Result<Vec<DynamicImage>, PanoramaError> {
        self(step)
    }
}
