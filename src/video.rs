//! FFmpeg-backed frame extraction.
//!
//! [`VideoFrameExtractor`] implements [`FrameExtractor`] by decoding the best
//! video stream of a media file from start to finish and keeping every
//! `step`-th decoded frame. Frames are returned as RGB8
//! [`image::DynamicImage`] values and can optionally be written to a
//! directory as they are kept.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{error::PanoramaError, frames::FrameExtractor};

/// Extracts sampled frames from a video file.
///
/// Every call to [`extract`](FrameExtractor::extract) opens the file afresh
/// and drops the demuxer, decoder and scaler before returning, so no decoding
/// state is shared between steps.
///
/// # Example
///
/// ```no_run
/// use panosweep::{FrameExtractor, VideoFrameExtractor};
///
/// let mut extractor = VideoFrameExtractor::new("input.mp4").with_frames_dir("frames");
/// let frames = extractor.extract(10)?;
/// println!("kept {} frames", frames.len());
/// # Ok::<(), panosweep::PanoramaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VideoFrameExtractor {
    path: PathBuf,
    frames_dir: Option<PathBuf>,
}

impl VideoFrameExtractor {
    /// Create an extractor for the video at `path`.
    ///
    /// The file is not touched until the first extraction.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frames_dir: None,
        }
    }

    /// Also write each kept frame to `dir` as `frame_<index>.jpg`.
    ///
    /// `<index>` is the frame's position in decode order. Files from an
    /// earlier step with the same index are overwritten.
    #[must_use]
    pub fn with_frames_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.frames_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Path of the video source.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_input(&self) -> Result<Input, PanoramaError> {
        log::debug!("Opening video source: {}", self.path.display());

        ffmpeg_next::init().map_err(|error| PanoramaError::SourceUnavailable {
            path: self.path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        ffmpeg_next::format::input(&self.path).map_err(|error| PanoramaError::SourceUnavailable {
            path: self.path.clone(),
            reason: error.to_string(),
        })
    }
}

impl FrameExtractor for VideoFrameExtractor {
    fn extract(&mut self, step: u32) -> Result<Vec<DynamicImage>, PanoramaError> {
        if step == 0 {
            return Err(PanoramaError::InvalidConfiguration(
                "sampling step must be greater than zero".to_string(),
            ));
        }

        let mut input_context = self.open_input()?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or(PanoramaError::NoVideoStream)?;

        let stream = input_context
            .stream(video_stream_index)
            .ok_or(PanoramaError::NoVideoStream)?;
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let mut decoder = decoder_context.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        // Source format → RGB24 at the native resolution. Scaling for the
        // stitcher happens later, once per step.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        if let Some(dir) = &self.frames_dir {
            fs::create_dir_all(dir)?;
        }

        let mut sampler = StepSampler::new(step, width, height, self.frames_dir.as_deref());

        for (stream, packet) in input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            sampler.receive(&mut decoder, &mut scaler)?;
        }

        // Flush the decoder.
        decoder.send_eof()?;
        sampler.receive(&mut decoder, &mut scaler)?;

        let frames = sampler.into_frames();
        log::info!(
            "Extracted {} frame(s) with step={} from {}",
            frames.len(),
            step,
            self.path.display()
        );
        Ok(frames)
    }
}

/// Keeps every `step`-th decoded frame.
struct StepSampler<'a> {
    step: u64,
    width: u32,
    height: u32,
    frames_dir: Option<&'a Path>,
    decoded: u64,
    frames: Vec<DynamicImage>,
}

impl<'a> StepSampler<'a> {
    fn new(step: u32, width: u32, height: u32, frames_dir: Option<&'a Path>) -> Self {
        Self {
            step: u64::from(step),
            width,
            height,
            frames_dir,
            decoded: 0,
            frames: Vec::new(),
        }
    }

    /// Drain every frame the decoder has ready.
    fn receive(
        &mut self,
        decoder: &mut VideoDecoder,
        scaler: &mut ScalingContext,
    ) -> Result<(), PanoramaError> {
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let index = self.decoded;
            self.decoded += 1;

            if !is_sampled(index, self.step) {
                continue;
            }

            scaler.run(&decoded_frame, &mut rgb_frame)?;
            let image = convert_frame_to_image(&rgb_frame, self.width, self.height)?;

            if let Some(dir) = self.frames_dir {
                let frame_path = dir.join(format!("frame_{index}.jpg"));
                image.save(&frame_path)?;
                log::debug!("Saved frame {} -> {}", index, frame_path.display());
            }

            self.frames.push(image);
        }

        Ok(())
    }

    fn into_frames(self) -> Vec<DynamicImage> {
        self.frames
    }
}

/// `true` for the decode-order indices kept at `step`: 0, step, 2·step, …
fn is_sampled(index: u64, step: u64) -> bool {
    index % step == 0
}

/// Convert a scaled RGB24 video frame to an [`image::DynamicImage`].
fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<DynamicImage, PanoramaError> {
    let buffer = crate::utilities::frame_to_rgb_buffer(rgb_frame, width, height);
    let rgb_image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        PanoramaError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(rgb_image))
}
