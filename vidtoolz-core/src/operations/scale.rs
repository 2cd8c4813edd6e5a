//! Resize the video frame.

use std::path::Path;

use super::{Outcome, Toolkit, ensure_exists, resolve_output};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};

/// Height value that keeps the aspect ratio and rounds to an even number.
pub const AUTO_HEIGHT: i32 = -2;

/// `ffmpeg -i INPUT -vf scale=W:H -y OUTPUT`
pub fn build_scale_command(
    base: ToolCommand,
    input: &Path,
    output: &Path,
    width: i32,
    height: i32,
) -> CoreResult<ToolCommand> {
    if width == 0 && height == 0 {
        return Err(CoreError::InvalidInput(
            "Width and height cannot both be 0.".to_string(),
        ));
    }
    Ok(base
        .input(input)
        .option("-vf", format!("scale={width}:{height}"))
        .overwrite_output(output))
}

pub fn scale_video(
    toolkit: &Toolkit<'_>,
    input: &Path,
    output: Option<&Path>,
    width: i32,
    height: Option<i32>,
) -> CoreResult<Outcome> {
    ensure_exists(input)?;
    let output = resolve_output(input, output, "scaled");
    let cmd = build_scale_command(
        toolkit.command(Tool::Ffmpeg),
        input,
        &output,
        width,
        height.unwrap_or(AUTO_HEIGHT),
    )?;
    toolkit.execute(&cmd, Operation::Scale, output)
}
