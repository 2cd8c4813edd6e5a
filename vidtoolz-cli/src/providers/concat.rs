//! `ffconcat`: join videos end to end.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::CoreResult;
use vidtoolz_core::operations::concat::{concat_videos, read_input_list};

use super::{FFMPEG, Messages, Report, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;
use crate::terminal;

const MESSAGES: Messages = Messages {
    done: "Videos FFmpeg concatenated",
    failed: "Error FFmpeg concatenating videos",
    tool: FFMPEG,
};

pub const NO_INPUTS_MESSAGE: &str =
    "Error: No input files provided. Use positional arguments or -i/--input-list.";

#[derive(Args, Debug, Clone)]
pub struct ConcatArgs {
    /// Path to input video files
    pub input_files: Vec<PathBuf>,

    /// Path to a text file containing input file paths (one per line)
    #[arg(short, long)]
    pub input_list: Option<PathBuf>,

    /// Path to the output video file (optional)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use slower but more compatible concatenation method
    #[arg(short = 'f', long)]
    pub no_fast: bool,
}

impl ConcatArgs {
    /// Positional inputs first, then the lines of the list file.
    pub fn inputs(&self) -> CoreResult<Vec<PathBuf>> {
        let mut inputs = self.input_files.clone();
        if let Some(list) = &self.input_list {
            inputs.extend(read_input_list(list)?);
        }
        Ok(inputs)
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<ConcatArgs, _>(
        "ffconcat",
        "Concatenate multiple videos using FFmpeg",
        handle,
    )
}

pub fn handle(args: ConcatArgs, ctx: &AppContext) -> CliResult<()> {
    let inputs = match args.inputs() {
        Ok(inputs) => inputs,
        Err(e) => {
            Report::from_error(&e).print(&MESSAGES);
            return Ok(());
        }
    };
    if inputs.is_empty() {
        terminal::print_error(NO_INPUTS_MESSAGE);
        return Ok(());
    }
    let result = concat_videos(&ctx.toolkit(), &inputs, args.output.as_deref(), !args.no_fast);
    report(result, &MESSAGES)
}
