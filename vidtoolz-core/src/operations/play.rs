//! Interactive playback through ffplay.

use std::path::Path;

use super::speed::atempo_chain;
use super::{Toolkit, ensure_exists};
use crate::command::{Tool, ToolCommand};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOptions {
    pub speed: f64,
    /// Number of loops; 0 loops forever.
    pub loops: u32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self { speed: 1.0, loops: 0 }
    }
}

/// `ffplay -loop N [-autoexit] [-vf setpts=.. -af atempo..] INPUT`
pub fn build_play_command(
    base: ToolCommand,
    input: &Path,
    options: &PlayOptions,
) -> CoreResult<ToolCommand> {
    if !(options.speed.is_finite() && options.speed > 0.0) {
        return Err(CoreError::InvalidInput(
            "Playback speed must be greater than 0.".to_string(),
        ));
    }

    let mut cmd = base.option("-loop", options.loops.to_string());
    if options.loops > 0 {
        cmd = cmd.arg("-autoexit");
    }
    if options.speed != 1.0 {
        let tempo = atempo_chain(options.speed).build().unwrap_or_default();
        cmd = cmd
            .option("-vf", format!("setpts={}*PTS", 1.0 / options.speed))
            .option("-af", tempo);
    }
    Ok(cmd.path(input))
}

/// Starts ffplay without waiting for it; returns the player's pid.
pub fn play_video(toolkit: &Toolkit<'_>, input: &Path, options: &PlayOptions) -> CoreResult<u32> {
    ensure_exists(input)?;
    let cmd = build_play_command(toolkit.command(Tool::Ffplay), input, options)?;
    toolkit.runner().launch(&cmd)
}
