//! Internal utility functions.
//!
//! Helpers for pixel-data copying and frame scaling that are shared between
//! the extractor and the search controller.

use ffmpeg_next::frame::Video as VideoFrame;
use image::{DynamicImage, imageops::FilterType};

/// Copy pixel data from an FFmpeg RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3).
/// The result can be passed directly to [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    }
}

/// Dimensions of a `width × height` image resized by `scale`.
///
/// Each side is rounded and clamped to at least one pixel.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let scaled_width = (f64::from(width) * scale).round().max(1.0) as u32;
    let scaled_height = (f64::from(height) * scale).round().max(1.0) as u32;
    (scaled_width, scaled_height)
}

/// Resize every frame by `scale`, preserving order.
///
/// A scale of exactly `1.0` returns the frames untouched.
pub fn scale_frames(frames: Vec<DynamicImage>, scale: f64) -> Vec<DynamicImage> {
    if scale == 1.0 {
        return frames;
    }

    frames
        .into_iter()
        .map(|frame| {
            let (width, height) = scaled_dimensions(frame.width(), frame.height(), scale);
            frame.resize_exact(width, height, FilterType::Triangle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, RgbImage};

    use super::{scale_frames, scaled_dimensions};

    #[test]
    fn halves_dimensions() {
        assert_eq!(scaled_dimensions(640, 480, 0.5), (320, 240));
    }

    #[test]
    fn never_collapses_to_zero() {
        assert_eq!(scaled_dimensions(3, 1, 0.1), (1, 1));
    }

    #[test]
    fn scale_frames_keeps_order_and_count() {
        let frames = vec![
            DynamicImage::ImageRgb8(RgbImage::new(10, 8)),
            DynamicImage::ImageRgb8(RgbImage::new(20, 16)),
        ];
        let scaled = scale_frames(frames, 0.5);
        assert_eq!(scaled.len(), 2);
        assert_eq!((scaled[0].width(), scaled[0].height()), (5, 4));
        assert_eq!((scaled[1].width(), scaled[1].height()), (10, 8));
    }

    #[test]
    fn unit_scale_is_identity() {
        let frames = vec![DynamicImage::ImageRgb8(RgbImage::new(7, 3))];
        let scaled = scale_frames(frames, 1.0);
        assert_eq!((scaled[0].width(), scaled[0].height()), (7, 3));
    }
}
