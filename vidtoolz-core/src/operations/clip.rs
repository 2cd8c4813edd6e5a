//! Trim a video between two timestamps.

use std::path::Path;

use super::{Outcome, Toolkit, ensure_exists, resolve_output};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::CoreResult;
use crate::time::{convert_to_seconds, format_seconds};

/// Time bounds of a clip, already normalized to seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipOptions {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub duration: Option<f64>,
}

impl ClipOptions {
    /// The end passed to ffmpeg. An explicit end wins over a duration;
    /// a duration counts from the start (or 0).
    #[must_use]
    pub fn effective_end(&self) -> Option<f64> {
        self.end
            .or_else(|| self.duration.map(|d| self.start.unwrap_or(0.0) + d))
    }

    fn validate(&self) -> CoreResult<()> {
        for value in [self.start, self.end, self.duration].into_iter().flatten() {
            convert_to_seconds(value)?;
        }
        Ok(())
    }
}

/// `ffmpeg [-ss START] -i INPUT [-to END] -y OUTPUT`
pub fn build_clip_command(
    base: ToolCommand,
    input: &Path,
    output: &Path,
    options: &ClipOptions,
) -> CoreResult<ToolCommand> {
    options.validate()?;

    let mut cmd = base;
    if let Some(start) = options.start {
        cmd = cmd.option("-ss", format_seconds(start));
    }
    cmd = cmd.input(input);
    if let Some(end) = options.effective_end() {
        cmd = cmd.option("-to", format_seconds(end));
    }
    Ok(cmd.overwrite_output(output))
}

pub fn clip_video(
    toolkit: &Toolkit<'_>,
    input: &Path,
    output: Option<&Path>,
    options: &ClipOptions,
) -> CoreResult<Outcome> {
    ensure_exists(input)?;
    let output = resolve_output(input, output, "clip");
    let cmd = build_clip_command(toolkit.command(Tool::Ffmpeg), input, &output, options)?;
    toolkit.execute(&cmd, Operation::Clip, output)
}
