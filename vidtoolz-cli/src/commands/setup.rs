//! `ffmpeg-setup`: check for or download the external tools.

use clap::Args;
use vidtoolz_core::operations::setup::{ToolStatus, check_tools, download_ffmpeg};

use crate::context::AppContext;
use crate::error::CliResult;
use crate::terminal;

#[derive(Args, Debug, Clone, Default)]
pub struct SetupArgs {
    /// Only report which tools are usable; download nothing
    #[arg(long)]
    pub check: bool,
}

/// One status line, e.g. `ffmpeg: ffmpeg version 7.1 (/usr/bin/ffmpeg)`.
#[must_use]
pub fn status_line(status: &ToolStatus) -> String {
    match &status.version {
        Some(version) => format!("{}: {} ({})", status.tool, version, status.path.display()),
        None => format!("{}: not found ({})", status.tool, status.path.display()),
    }
}

pub fn run_setup(args: SetupArgs, ctx: &AppContext) -> CliResult<()> {
    if !args.check {
        match download_ffmpeg() {
            Ok(path) => terminal::print_success(&format!("ffmpeg is available at {}", path.display())),
            Err(e) => {
                terminal::print_error(&format!("An error occurred: {e}"));
                return Ok(());
            }
        }
    }

    for status in check_tools(&ctx.toolkit()) {
        let line = status_line(&status);
        if status.available() {
            terminal::print_success(&line);
        } else {
            terminal::print_error(&line);
        }
    }
    Ok(())
}
