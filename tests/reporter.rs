//! ResultReporter and SearchSummary tests.

use std::time::Duration;

use image::{DynamicImage, RgbImage, RgbaImage};
use panosweep::{
    BestResult, PanoramaError, ResultReporter, SearchOutcome, StitchAttempt, StopReason,
};

fn outcome_with(panorama: Option<DynamicImage>, elapsed: Duration) -> SearchOutcome {
    let attempts = vec![
        StitchAttempt {
            step: 2,
            subset_size: 4,
            elapsed: Duration::from_millis(300),
            failure: Some("Stitching failed: homography".to_string()),
        },
        StitchAttempt {
            step: 2,
            subset_size: 6,
            elapsed,
            failure: None,
        },
    ];

    SearchOutcome {
        best: panorama.map(|panorama| BestResult {
            panorama,
            step: 2,
            subset_size: 6,
            elapsed,
        }),
        attempts,
        steps: Vec::new(),
        stop_reason: StopReason::StepsExhausted,
    }
}

fn panorama() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::new(40, 10))
}

#[test]
fn report_saves_panorama_and_summarises() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panorama.jpg");
    let outcome = outcome_with(Some(panorama()), Duration::from_millis(400));

    let summary = ResultReporter::new(&output)
        .report(&outcome, Duration::from_secs(1))
        .unwrap();

    assert!(output.exists());
    assert_eq!(image::open(&output).unwrap().width(), 40);
    assert_eq!(summary.step, 2);
    assert_eq!(summary.subset_size, 6);
    assert_eq!(summary.dimensions, (40, 10));
    assert_eq!(summary.attempts, 2);
    assert!(summary.within_budget);
}

#[test]
fn summary_text_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panorama.png");
    let outcome = outcome_with(Some(panorama()), Duration::from_millis(1500));

    let summary = ResultReporter::new(&output)
        .report(&outcome, Duration::from_secs(1))
        .unwrap();
    assert!(!summary.within_budget);

    let text = summary.to_string();
    assert!(text.starts_with("Best panorama saved to"));
    assert!(text.contains("step=2, frames=6, time=1.50s"));

    let json = summary.to_json();
    assert_eq!(json["step"], 2);
    assert_eq!(json["frames"], 6);
    assert_eq!(json["width"], 40);
    assert_eq!(json["within_budget"], false);
    assert_eq!(json["elapsed_seconds"], 1.5);
}

#[test]
fn empty_outcome_is_no_result() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panorama.jpg");
    let outcome = outcome_with(None, Duration::from_millis(400));

    let result = ResultReporter::new(&output).report(&outcome, Duration::from_secs(1));

    assert!(matches!(result, Err(PanoramaError::NoResultFound)));
    assert!(!output.exists());
}

#[test]
fn existing_output_requires_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panorama.png");
    std::fs::write(&output, b"old").unwrap();
    let outcome = outcome_with(Some(panorama()), Duration::from_millis(400));

    let reporter = ResultReporter::new(&output);
    assert_eq!(reporter.output(), output.as_path());
    assert!(matches!(
        reporter.check_writable(),
        Err(PanoramaError::OutputExists(_))
    ));
    assert!(matches!(
        reporter.report(&outcome, Duration::from_secs(1)),
        Err(PanoramaError::OutputExists(_))
    ));

    ResultReporter::new(&output)
        .with_overwrite(true)
        .report(&outcome, Duration::from_secs(1))
        .unwrap();
    assert_eq!(image::open(&output).unwrap().height(), 10);
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out").join("nested").join("panorama.png");
    let outcome = outcome_with(Some(panorama()), Duration::from_millis(400));

    ResultReporter::new(&output)
        .report(&outcome, Duration::from_secs(1))
        .unwrap();
    assert!(output.exists());
}

#[test]
fn alpha_panorama_can_be_saved_as_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panorama.jpeg");
    let rgba = DynamicImage::ImageRgba8(RgbaImage::new(16, 8));
    let outcome = outcome_with(Some(rgba), Duration::from_millis(400));

    let summary = ResultReporter::new(&output)
        .report(&outcome, Duration::from_secs(1))
        .unwrap();
    assert_eq!(summary.dimensions, (16, 8));
    assert!(!image::open(&output).unwrap().color().has_alpha());
}
