//! The stitching port.
//!
//! [`StitchingEngine`] is the contract the search controller relies on: hand
//! over an ordered set of frames, get a panorama back or a failure.
//! [`CommandStitcher`] fulfils it by delegating to an external program, and
//! closures fulfil it in tests.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use image::DynamicImage;

use crate::error::PanoramaError;

/// Composes an ordered set of frames into one panorama.
///
/// `Ok` means the engine reported success; any `Err` is a failed attempt.
/// Implementations are not required to time themselves.
pub trait StitchingEngine {
    /// Stitch `frames` in the order given.
    ///
    /// # Errors
    ///
    /// [`PanoramaError::StitchFailed`] when the engine cannot compose the
    /// frames, [`PanoramaError::StitchTooFewImages`] for fewer than two, or
    /// an I/O / image error from moving the frames around.
    fn stitch(&mut self, frames: &[DynamicImage]) -> Result<DynamicImage, PanoramaError>;
}

impl<F> StitchingEngine for F
where
    F: FnMut(&[DynamicImage]) -> Result<DynamicImage, PanoramaError>,
{
    fn stitch(&mut self, frames: &[DynamicImage]) -> Result<DynamicImage, PanoramaError> {
        self(frames)
    }
}

/// Stitches by running an external program.
///
/// For each attempt the frames are written as PNG files into a fresh
/// temporary directory and the program is invoked as
///
/// ```text
/// <program> [args...] <output.png> <input_0000.png> <input_0001.png> ...
/// ```
///
/// Exit status 0 plus a readable `<output.png>` is success. The temporary
/// directory is removed when the attempt returns, whatever the outcome.
///
/// The search times the whole [`stitch`](StitchingEngine::stitch) call, not
/// just the external program. Encoding the inputs as PNG, starting the
/// process and decoding `<output.png>` all count against the time budget, and
/// that overhead grows with the number of frames. A smaller
/// [`scale`](crate::SearchOptions::with_scale) keeps it down.
///
/// # Example
///
/// ```no_run
/// use panosweep::{CommandStitcher, StitchingEngine};
///
/// let mut stitcher = CommandStitcher::new("python3").with_arg("stitch.py");
/// # let frames: Vec<image::DynamicImage> = Vec::new();
/// let panorama = stitcher.stitch(&frames)?;
/// # Ok::<(), panosweep::PanoramaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CommandStitcher {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandStitcher {
    /// Create a stitcher that runs `program`.
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument placed before the output and input paths.
    #[must_use]
    pub fn with_arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several leading arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn write_inputs(
        &self,
        workspace: &Path,
        frames: &[DynamicImage],
    ) -> Result<Vec<PathBuf>, PanoramaError> {
        let mut inputs = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let input_path = workspace.join(format!("input_{index:04}.png"));
            frame.save(&input_path)?;
            inputs.push(input_path);
        }
        Ok(inputs)
    }
}

impl StitchingEngine for CommandStitcher {
    fn stitch(&mut self, frames: &[DynamicImage]) -> Result<DynamicImage, PanoramaError> {
        if frames.len() < 2 {
            return Err(PanoramaError::StitchTooFewImages(frames.len()));
        }

        let workspace = tempfile::tempdir()?;
        let inputs = self.write_inputs(workspace.path(), frames)?;
        let output_path = workspace.path().join("panorama.png");

        let program = self.program.to_string_lossy().into_owned();
        log::debug!(
            "Running stitcher: {} ({} input(s)) in {}",
            program,
            inputs.len(),
            workspace.path().display()
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&output_path)
            .args(&inputs)
            .output()
            .map_err(|error| {
                PanoramaError::StitchFailed(format!("failed to run {program}: {error}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PanoramaError::StitchFailed(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if !output_path.exists() {
            return Err(PanoramaError::StitchFailed(format!(
                "{program} succeeded but wrote no panorama"
            )));
        }

        Ok(image::open(&output_path)?)
    }
}
