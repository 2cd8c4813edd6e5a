//! `clip`: cut a section out of a video.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::Timestamp;
use vidtoolz_core::operations::clip::{ClipOptions, clip_video};

use super::{FFMPEG, Messages, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;

const MESSAGES: Messages = Messages {
    done: "Video clipped",
    failed: "Error clipping video",
    tool: FFMPEG,
};

#[derive(Args, Debug, Clone)]
pub struct ClipArgs {
    /// Path to the input video file
    #[arg(value_name = "INPUT")]
    pub input_file: PathBuf,

    /// Path to the output video file (optional)
    #[arg(value_name = "OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Start time (seconds, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub start: Option<Timestamp>,

    /// End time (seconds, MM:SS or HH:MM:SS)
    #[arg(short, long)]
    pub end: Option<Timestamp>,

    /// Duration of the clip; ignored when --end is given
    #[arg(short, long)]
    pub duration: Option<Timestamp>,
}

impl ClipArgs {
    #[must_use]
    pub fn options(&self) -> ClipOptions {
        ClipOptions {
            start: self.start.map(Timestamp::as_secs_f64),
            end: self.end.map(Timestamp::as_secs_f64),
            duration: self.duration.map(Timestamp::as_secs_f64),
        }
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<ClipArgs, _>("clip", "Clip a video file", handle)
}

pub fn handle(args: ClipArgs, ctx: &AppContext) -> CliResult<()> {
    let result = clip_video(
        &ctx.toolkit(),
        &args.input_file,
        args.output_file.as_deref(),
        &args.options(),
    );
    report(result, &MESSAGES)
}
