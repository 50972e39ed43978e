use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use panosweep::{
    CommandStitcher, FfmpegLogLevel, PanoramaError, PanoramaSearch, ProgressCallback,
    ProgressInfo, ResultReporter, SearchOptions, SearchPhase, VideoFrameExtractor,
};

const CLI_AFTER_HELP: &str = "Examples:\n  panosweep search drone.mp4 --stitcher ./stitch.sh --out panorama.jpg\n  panosweep search drone.mp4 --stitcher python3 --stitcher-arg stitch.py --time-budget 2 --progress\n  panosweep steps --min-step 1 --max-step 30 --growth 2\n  panosweep completions zsh > _panosweep";

#[derive(Debug, Parser)]
#[command(
    name = "panosweep",
    version,
    about = "Search sampling step and frame count for the largest panorama stitched within a time budget",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Show a live spinner with the current step and subset size.
    #[arg(long, global = true)]
    progress: bool,

    /// Allow overwriting an existing panorama file.
    #[arg(long, global = true)]
    overwrite: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long, global = true, default_value = "error")]
    ffmpeg_log_level: String,
}

/// Bounds of the step schedule.
#[derive(Debug, Args, Clone)]
struct StepArgs {
    /// First sampling step (keep every Nth frame).
    #[arg(long, default_value_t = 2)]
    min_step: u32,

    /// Largest sampling step (inclusive).
    #[arg(long, default_value_t = 10)]
    max_step: u32,

    /// Geometric growth factor between steps (must be > 1).
    #[arg(long, default_value_t = 1.5)]
    growth: f64,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the search and save the best panorama.
    #[command(
        about = "Search for the best panorama",
        after_help = "The stitcher is invoked as: <stitcher> [stitcher-args...] <output.png> <input_0000.png> ...\nIt must exit with status 0 and write the panorama to <output.png> on success."
    )]
    Search {
        /// Input video path.
        input: PathBuf,

        /// Output panorama path (format from extension).
        #[arg(long, default_value = "panorama.jpg")]
        out: PathBuf,

        /// External stitching program.
        #[arg(long)]
        stitcher: String,

        /// Argument passed to the stitcher before the image paths (repeatable).
        #[arg(long = "stitcher-arg", allow_hyphen_values = true)]
        stitcher_args: Vec<String>,

        /// Also write every extracted frame to this directory.
        #[arg(long)]
        frames_dir: Option<PathBuf>,

        #[command(flatten)]
        steps: StepArgs,

        /// Resize factor applied to frames before stitching.
        #[arg(long, default_value_t = panosweep::DEFAULT_SCALE)]
        scale: f64,

        /// Per-attempt time budget in seconds.
        #[arg(long, default_value_t = 1.0)]
        time_budget: f64,

        /// Smallest number of frames stitched per step.
        #[arg(long, default_value_t = 4)]
        subset_floor: usize,

        /// Increment between subset sizes.
        #[arg(long, default_value_t = 2)]
        subset_increment: usize,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the step values a search would visit.
    #[command(about = "Print the step schedule")]
    Steps {
        #[command(flatten)]
        steps: StepArgs,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_time_budget(seconds: f64) -> Result<Duration, Box<dyn std::error::Error>> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("--time-budget must be a non-negative number, got {seconds}").into())
}

/// Add the CLI flag that resolves the error, where there is one.
fn with_cli_hint(error: PanoramaError) -> Box<dyn std::error::Error> {
    match error {
        PanoramaError::OutputExists(path) => format!(
            "{} already exists (use --overwrite to replace)",
            path.display()
        )
        .into(),
        other => other.into(),
    }
}

fn init_logging(global: &GlobalOptions) {
    let default_filter = if global.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(global);
    let level: FfmpegLogLevel = global.ffmpeg_log_level.parse()?;
    panosweep::set_ffmpeg_log_level(level);
    Ok(())
}

struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(100));
        Ok(Self { bar })
    }
}

impl ProgressCallback for SpinnerProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let best = info
            .best_subset_size
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        match info.phase {
            SearchPhase::StepStarted => {
                self.bar
                    .set_message(format!("step {} | extracting frames | best {best}", info.step));
            }
            SearchPhase::FramesExtracted => {
                self.bar.set_message(format!(
                    "step {} | {} frame(s) | best {best}",
                    info.step,
                    info.extracted.unwrap_or(0)
                ));
            }
            SearchPhase::AttemptFinished => {
                let outcome = if info.succeeded == Some(true) { "ok" } else { "failed" };
                self.bar.set_message(format!(
                    "step {} | n={} {outcome} in {:.2}s | best {best} | {} attempt(s)",
                    info.step,
                    info.subset_size.unwrap_or(0),
                    info.attempt_elapsed.unwrap_or_default().as_secs_f64(),
                    info.attempts
                ));
            }
            _ => self.bar.finish_and_clear(),
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Search {
            input,
            out,
            stitcher,
            stitcher_args,
            frames_dir,
            steps,
            scale,
            time_budget,
            subset_floor,
            subset_increment,
            json,
        } => {
            let mut options = SearchOptions::new()
                .with_min_step(steps.min_step)
                .with_max_step(steps.max_step)
                .with_growth_factor(steps.growth)
                .with_scale(scale)
                .with_time_budget(parse_time_budget(time_budget)?)
                .with_subset_floor(subset_floor)
                .with_subset_increment(subset_increment);
            options.validate()?;

            let reporter = ResultReporter::new(&out).with_overwrite(cli.global.overwrite);
            reporter.check_writable().map_err(with_cli_hint)?;
            if reporter.output().exists() {
                eprintln!(
                    "{} {}",
                    "warning:".yellow().bold(),
                    format!("overwriting {}", reporter.output().display()).yellow()
                );
            }

            if cli.global.progress {
                options = options.with_progress(Arc::new(SpinnerProgress::new()?));
            }

            let mut extractor = VideoFrameExtractor::new(&input);
            if let Some(dir) = frames_dir {
                extractor = extractor.with_frames_dir(dir);
            }
            let mut engine = CommandStitcher::new(stitcher).with_args(stitcher_args);

            let search = PanoramaSearch::new(options);
            let budget = search.options().time_budget();
            let outcome = search.run(&mut extractor, &mut engine)?;

            match reporter.report(&outcome, budget) {
                Ok(summary) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&summary.to_json())?);
                    } else {
                        println!("{} {}", "success:".green().bold(), summary);
                        if !summary.within_budget {
                            eprintln!(
                                "{} {}",
                                "warning:".yellow().bold(),
                                format!(
                                    "best panorama took longer than the {:.2}s budget",
                                    budget.as_secs_f64()
                                )
                                .yellow()
                            );
                        }
                    }
                }
                Err(PanoramaError::NoResultFound) => {
                    if json {
                        let payload = json!({
                            "found": false,
                            "output": reporter.output().display().to_string(),
                            "attempts": outcome.attempts.len(),
                            "steps_tried": outcome.steps_tried(),
                        });
                        println!("{}", serde_json::to_string_pretty(&payload)?);
                    }
                    return Err(format!(
                        "could not create a panorama ({} attempt(s) over steps {:?})",
                        outcome.attempts.len(),
                        outcome.steps_tried()
                    )
                    .into());
                }
                Err(error) => return Err(with_cli_hint(error)),
            }
        }
        Commands::Steps { steps } => {
            let options = SearchOptions::new()
                .with_min_step(steps.min_step)
                .with_max_step(steps.max_step)
                .with_growth_factor(steps.growth);
            options.validate()?;
            println!("Steps to try: {:?}", options.step_values());
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "panosweep", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use panosweep::PanoramaError;

    use super::{Cli, Commands, parse_time_budget, with_cli_hint};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_defaults_follow_library_defaults() {
        let cli = Cli::try_parse_from(["panosweep", "search", "in.mp4", "--stitcher", "stitch"])
            .expect("valid arguments");
        match cli.command {
            Commands::Search {
                out,
                steps,
                scale,
                time_budget,
                subset_floor,
                subset_increment,
                ..
            } => {
                assert_eq!(out.to_str(), Some("panorama.jpg"));
                assert_eq!((steps.min_step, steps.max_step), (2, 10));
                assert_eq!(steps.growth, 1.5);
                assert_eq!(scale, 0.5);
                assert_eq!(time_budget, 1.0);
                assert_eq!((subset_floor, subset_increment), (4, 2));
            }
            other => panic!("Expected search, got {other:?}"),
        }
    }

    #[test]
    fn repeated_stitcher_args_keep_order() {
        let cli = Cli::try_parse_from([
            "panosweep",
            "search",
            "in.mp4",
            "--stitcher",
            "python3",
            "--stitcher-arg",
            "stitch.py",
            "--stitcher-arg",
            "--mode=panorama",
        ])
        .expect("valid arguments");
        match cli.command {
            Commands::Search { stitcher_args, .. } => {
                assert_eq!(stitcher_args, vec!["stitch.py", "--mode=panorama"]);
            }
            other => panic!("Expected search, got {other:?}"),
        }
    }

    #[test]
    fn time_budget_parsing() {
        assert_eq!(parse_time_budget(1.5).unwrap().as_millis(), 1500);
        assert!(parse_time_budget(-1.0).is_err());
        assert!(parse_time_budget(f64::NAN).is_err());
    }

    #[test]
    fn existing_output_error_names_the_overwrite_flag() {
        let message = with_cli_hint(PanoramaError::OutputExists("panorama.jpg".into())).to_string();
        assert!(message.contains("panorama.jpg"), "{message}");
        assert!(message.contains("--overwrite"), "{message}");
    }

    #[test]
    fn other_errors_pass_through_unchanged() {
        let message = with_cli_hint(PanoramaError::NoResultFound).to_string();
        assert_eq!(message, PanoramaError::NoResultFound.to_string());
    }
}
