//! `speed`: change playback rate.
//!
//! Positionals are `INPUT [OUTPUT] SPEED`.

use std::path::PathBuf;

use clap::Args;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use vidtoolz_core::operations::speed::change_video_speed;
use vidtoolz_core::{AudioMode, CoreError};

use super::{FFMPEG, Messages, Report, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;

const MESSAGES: Messages = Messages {
    done: "Video speed changed",
    failed: "Error changing video speed",
    tool: FFMPEG,
};

#[derive(Args, Debug, Clone)]
pub struct SpeedArgs {
    /// INPUT [OUTPUT] SPEED; SPEED between 0.1 and 10.0
    #[arg(value_name = "ARGS", num_args = 2..=3, required = true, allow_negative_numbers = true)]
    pub positionals: Vec<String>,

    /// What happens to the audio: adjust (change with video), mute, or keep
    #[arg(
        short,
        long,
        default_value_t = AudioMode::Adjust,
        value_parser = PossibleValuesParser::new(["adjust", "mute", "keep"]).try_map(|s| s.parse::<AudioMode>())
    )]
    pub audio_mode: AudioMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub factor: f64,
}

impl SpeedArgs {
    pub fn request(&self) -> Result<SpeedRequest, CoreError> {
        let (input, output, factor) = match self.positionals.as_slice() {
            [input, factor] => (input, None, factor),
            [input, output, factor] => (input, Some(output), factor),
            _ => {
                return Err(CoreError::InvalidInput(
                    "Expected INPUT [OUTPUT] SPEED.".to_string(),
                ));
            }
        };
        let factor = factor
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidInput(format!("Speed must be a number, got '{factor}'.")))?;
        Ok(SpeedRequest {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            factor,
        })
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<SpeedArgs, _>("speed", "Change the playback speed of a video", handle)
}

pub fn handle(args: SpeedArgs, ctx: &AppContext) -> CliResult<()> {
    let request = match args.request() {
        Ok(request) => request,
        Err(e) => {
            Report::from_error(&e).print(&MESSAGES);
            return Ok(());
        }
    };
    let result = change_video_speed(
        &ctx.toolkit(),
        &request.input,
        request.output.as_deref(),
        request.factor,
        args.audio_mode,
    );
    report(result, &MESSAGES)
}
