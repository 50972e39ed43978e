//! SearchOptions, schedule, and error message tests.

use std::time::Duration;

use panosweep::{
    DEFAULT_SCALE, DEFAULT_TIME_BUDGET, FfmpegLogLevel, PanoramaError, SearchOptions,
    StepSchedule, SubsetSchedule,
};

// ── SearchOptions builder ──────────────────────────────────────────

#[test]
fn defaults_match_reference_workflow() {
    let options = SearchOptions::new();
    assert_eq!(options.step_schedule(), StepSchedule::new(2, 10, 1.5));
    assert_eq!(options.subset_schedule(), SubsetSchedule::new(4, 2));
    assert_eq!(options.time_budget(), DEFAULT_TIME_BUDGET);
    assert_eq!(options.time_budget(), Duration::from_secs(1));
    assert_eq!(options.scale(), DEFAULT_SCALE);
    assert_eq!(options.step_values(), vec![2, 3, 4, 6]);
    assert!(options.validate().is_ok());
}

#[test]
fn debug_output_names_fields() {
    let debug = format!("{:?}", SearchOptions::new().with_min_extracted_frames(3));
    assert!(debug.contains("SearchOptions"));
    assert!(debug.contains("min_extracted_frames: 3"));
}

#[test]
fn builder_overrides_schedule() {
    let options = SearchOptions::new()
        .with_min_step(1)
        .with_max_step(30)
        .with_growth_factor(2.0);
    assert_eq!(options.step_values(), vec![1, 2, 4, 8, 16]);
}

#[test]
fn step_schedule_can_be_replaced_whole() {
    let options = SearchOptions::new().with_step_schedule(StepSchedule::new(5, 5, 1.5));
    assert_eq!(options.step_values(), vec![5]);
}

#[test]
fn subset_builders_update_schedule() {
    let options = SearchOptions::new()
        .with_subset_floor(3)
        .with_subset_increment(3);
    assert_eq!(options.subset_schedule().sizes(10), vec![3, 6, 9]);
}

// ── Validation ─────────────────────────────────────────────────────

fn assert_invalid(options: SearchOptions, fragment: &str) {
    match options.validate() {
        Err(PanoramaError::InvalidConfiguration(message)) => {
            assert!(message.contains(fragment), "{message}");
        }
        other => panic!("Expected InvalidConfiguration, got: {other:?}"),
    }
}

#[test]
fn inverted_step_bounds_are_rejected() {
    assert_invalid(SearchOptions::new().with_min_step(11), "step schedule is empty");
}

#[test]
fn zero_min_step_is_rejected() {
    assert_invalid(SearchOptions::new().with_min_step(0), "step schedule is empty");
}

#[test]
fn non_growing_factor_is_rejected() {
    assert_invalid(SearchOptions::new().with_growth_factor(1.0), "step schedule is empty");
    assert_invalid(
        SearchOptions::new().with_growth_factor(f64::NAN),
        "step schedule is empty",
    );
}

#[test]
fn non_positive_scale_is_rejected() {
    assert_invalid(SearchOptions::new().with_scale(0.0), "scale");
    assert_invalid(SearchOptions::new().with_scale(-0.5), "scale");
    assert_invalid(SearchOptions::new().with_scale(f64::INFINITY), "scale");
}

#[test]
fn zero_time_budget_is_rejected() {
    assert_invalid(
        SearchOptions::new().with_time_budget(Duration::ZERO),
        "time budget",
    );
}

#[test]
fn zero_subset_parameters_are_rejected() {
    assert_invalid(SearchOptions::new().with_subset_floor(0), "subset floor");
    assert_invalid(SearchOptions::new().with_subset_increment(0), "subset increment");
}

// ── Errors and FFmpeg log level ────────────────────────────────────

#[test]
fn no_result_message_is_stable() {
    assert_eq!(
        PanoramaError::NoResultFound.to_string(),
        "Could not create a panorama with any step or frame count"
    );
}

#[test]
fn insufficient_frames_message_names_step() {
    let message = PanoramaError::InsufficientFrames {
        step: 6,
        extracted: 1,
    }
    .to_string();
    assert!(message.contains("Step 6"));
    assert!(message.contains("1 frame"));
}

#[test]
fn output_exists_message_names_only_the_path() {
    let message = PanoramaError::OutputExists("out/panorama.jpg".into()).to_string();
    assert_eq!(message, "Output already exists: out/panorama.jpg");
}

#[test]
fn io_errors_convert() {
    let error: PanoramaError = std::io::Error::other("disk full").into();
    assert!(matches!(error, PanoramaError::IoError(_)));
}

#[test]
fn ffmpeg_log_level_parses_names() {
    assert_eq!("warning".parse::<FfmpegLogLevel>().ok(), Some(FfmpegLogLevel::Warning));
    assert_eq!("WARN".parse::<FfmpegLogLevel>().ok(), Some(FfmpegLogLevel::Warning));
    assert_eq!("quiet".parse::<FfmpegLogLevel>().ok(), Some(FfmpegLogLevel::Quiet));
    assert!(matches!(
        "loud".parse::<FfmpegLogLevel>(),
        Err(PanoramaError::InvalidConfiguration(_))
    ));
}
