//! Stream metadata through ffprobe.

use std::path::Path;

use super::{Toolkit, ensure_exists};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::CoreResult;
use crate::process::ProcessOutput;

/// `ffprobe -v error -show_streams -show_format -of json INPUT`
#[must_use]
pub fn build_info_command(base: ToolCommand, input: &Path) -> ToolCommand {
    base.option("-v", "error")
        .arg("-show_streams")
        .arg("-show_format")
        .option("-of", "json")
        .path(input)
}

/// Runs the probe; the JSON document is in `stdout`, the full log in `log`.
pub fn get_video_info(toolkit: &Toolkit<'_>, input: &Path) -> CoreResult<ProcessOutput> {
    ensure_exists(input)?;
    let cmd = build_info_command(toolkit.command(Tool::Ffprobe), input);
    toolkit.run(&cmd, Operation::Probe)
}
