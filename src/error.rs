//! Error types for the `panosweep` crate.
//!
//! This module defines [`PanoramaError`], the unified error type returned by
//! all fallible operations in the crate. Most variants describe conditions the
//! search loop absorbs and moves past (an unreadable source, a failed stitch);
//! only [`PanoramaError::InvalidConfiguration`] stops a search before it
//! starts.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `panosweep` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PanoramaError {
    /// The video source could not be opened.
    #[error("Failed to open video source at {path}: {reason}")]
    SourceUnavailable {
        /// Path that was handed to the extractor.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The source does not contain a video stream.
    #[error("No video stream found in source")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while scaling, loading or saving.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// Extraction at a step produced too few frames to attempt a stitch.
    #[error("Step {step} yielded {extracted} frame(s), not enough to stitch")]
    InsufficientFrames {
        /// The sampling step that was extracted.
        step: u32,
        /// How many frames the extractor returned.
        extracted: usize,
    },

    /// The stitching engine reported a failure.
    #[error("Stitching failed: {0}")]
    StitchFailed(String),

    /// The stitching engine was handed fewer than two images.
    #[error("Stitching needs at least 2 images, got {0}")]
    StitchTooFewImages(usize),

    /// The search finished without a single successful stitch.
    #[error("Could not create a panorama with any step or frame count")]
    NoResultFound,

    /// Search parameters are unusable (e.g. they produce no step values).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The output path already exists and overwriting was not allowed.
    #[error("Output already exists: {0}")]
    OutputExists(PathBuf),
}

impl From<FfmpegError> for PanoramaError {
    fn from(error: FfmpegError) -> Self {
        PanoramaError::FfmpegError(error.to_string())
    }
}
