//! `play`: open a video in ffplay.
//!
//! The player is started detached and keeps running after we return.

use std::path::{Path, PathBuf};

use clap::Args;
use vidtoolz_core::operations::play::{PlayOptions, play_video};

use super::{FFPLAY, Messages, Report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;
use crate::terminal;

const MESSAGES: Messages = Messages {
    done: "Video playing",
    failed: "Error playing video",
    tool: FFPLAY,
};

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Path to the video file
    pub video_file: PathBuf,

    /// Playback speed
    #[arg(short, long, default_value_t = 1.0)]
    pub speed: f64,

    /// Number of times to loop; 0 loops forever
    #[arg(short, long = "loop", default_value_t = 0)]
    pub loops: u32,
}

/// Shown once ffplay has started, e.g. `Video playing: clip.mp4 (pid 4242)`.
#[must_use]
pub fn playing_line(video: &Path, pid: u32) -> String {
    format!("{}: {} (pid {})", MESSAGES.done, video.display(), pid)
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<PlayArgs, _>("play", "Play a video file with ffplay", handle)
}

pub fn handle(args: PlayArgs, ctx: &AppContext) -> CliResult<()> {
    let options = PlayOptions {
        speed: args.speed,
        loops: args.loops,
    };
    match play_video(&ctx.toolkit(), &args.video_file, &options) {
        Ok(pid) => terminal::print_success(&playing_line(&args.video_file, pid)),
        Err(e) => Report::from_error(&e).print(&MESSAGES),
    }
    Ok(())
}
