//! `scale`: resize a video.
//!
//! Positionals are `INPUT [OUTPUT] WIDTH [HEIGHT]`. With three values the
//! middle one is read as the output path unless both trailing values are
//! integers, in which case they are the width and height.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::CoreError;
use vidtoolz_core::operations::scale::scale_video;

use super::{FFMPEG, Messages, Report, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;

const MESSAGES: Messages = Messages {
    done: "Video scaled",
    failed: "Error scaling video",
    tool: FFMPEG,
};

#[derive(Args, Debug, Clone)]
pub struct ScaleArgs {
    /// INPUT [OUTPUT] WIDTH [HEIGHT]; HEIGHT defaults to -2 (keep aspect ratio)
    #[arg(
        value_name = "ARGS",
        num_args = 2..=4,
        required = true,
        allow_negative_numbers = true
    )]
    pub positionals: Vec<String>,
}

/// Positionals resolved into their roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub width: i32,
    pub height: Option<i32>,
}

fn parse_dimension(value: &str, name: &str) -> Result<i32, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::InvalidInput(format!("{name} must be an integer, got '{value}'.")))
}

impl ScaleArgs {
    pub fn request(&self) -> Result<ScaleRequest, CoreError> {
        let p = &self.positionals;
        let (input, output, width, height) = match p.as_slice() {
            [input, width] => (input, None, width, None),
            [input, second, third] => {
                if second.parse::<i32>().is_ok() && third.parse::<i32>().is_ok() {
                    (input, None, second, Some(third))
                } else {
                    (input, Some(second), third, None)
                }
            }
            [input, output, width, height] => (input, Some(output), width, Some(height)),
            _ => {
                return Err(CoreError::InvalidInput(
                    "Expected INPUT [OUTPUT] WIDTH [HEIGHT].".to_string(),
                ));
            }
        };
        Ok(ScaleRequest {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            width: parse_dimension(width, "Width")?,
            height: height.map(|h| parse_dimension(h, "Height")).transpose()?,
        })
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<ScaleArgs, _>("scale", "Scale a video file", handle)
}

pub fn handle(args: ScaleArgs, ctx: &AppContext) -> CliResult<()> {
    let request = match args.request() {
        Ok(request) => request,
        Err(e) => {
            Report::from_error(&e).print(&MESSAGES);
            return Ok(());
        }
    };
    let result = scale_video(
        &ctx.toolkit(),
        &request.input,
        request.output.as_deref(),
        request.width,
        request.height,
    );
    report(result, &MESSAGES)
}
