//! `info`: print stream and container metadata.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::operations::info::get_video_info;

use super::{FFPROBE, Messages, Report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;
use crate::terminal;

const MESSAGES: Messages = Messages {
    done: "Video information",
    failed: "Error getting video info",
    tool: FFPROBE,
};

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to the video file
    pub video_file: PathBuf,
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<InfoArgs, _>("info", "Get information about a video file", handle)
}

pub fn handle(args: InfoArgs, ctx: &AppContext) -> CliResult<()> {
    match get_video_info(&ctx.toolkit(), &args.video_file) {
        Ok(output) if output.success() => {
            terminal::print_heading("Video information:");
            terminal::print_block(&output.log);
        }
        Ok(output) => Report::ProcessFailed {
            exit_code: output.exit_code,
            log: output.log,
        }
        .print(&MESSAGES),
        Err(e) => Report::from_error(&e).print(&MESSAGES),
    }
    Ok(())
}
