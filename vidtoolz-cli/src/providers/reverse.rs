//! `reverse`: play a video backwards.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::ReverseEngine;
use vidtoolz_core::operations::reverse::reverse_video;

use super::{FFMPEG, Messages, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;

const MESSAGES: Messages = Messages {
    done: "Video reversed",
    failed: "Error reversing video",
    tool: FFMPEG,
};

#[derive(Args, Debug, Clone)]
pub struct ReverseArgs {
    /// Path to the input video file
    pub input_file: PathBuf,

    /// Path to the output video file (optional)
    pub output_file: Option<PathBuf>,

    /// Reverse in fixed-length chunks; slower, but bounded memory on long inputs
    #[arg(long)]
    pub use_alt_engine: bool,
}

impl ReverseArgs {
    #[must_use]
    pub fn engine(&self) -> ReverseEngine {
        if self.use_alt_engine {
            ReverseEngine::Segmented
        } else {
            ReverseEngine::Filter
        }
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<ReverseArgs, _>("reverse", "Reverse a video file", handle)
}

pub fn handle(args: ReverseArgs, ctx: &AppContext) -> CliResult<()> {
    let result = reverse_video(
        &ctx.toolkit(),
        &args.input_file,
        args.output_file.as_deref(),
        args.engine(),
    );
    report(result, &MESSAGES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::{context, touch};
    use vidtoolz_core::mocks::RecordingRunner;

    #[test]
    fn test_default_engine_is_one_ffmpeg_call() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "in.mp4");
        let runner = RecordingRunner::new();
        let ctx = context(&dir, &runner);
        let args = ReverseArgs {
            input_file: input,
            output_file: None,
            use_alt_engine: false,
        };
        assert_eq!(args.engine(), ReverseEngine::Filter);
        handle(args, &ctx).unwrap();
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].get_args().last().unwrap().ends_with("in_reversed.mp4"));
    }

    #[test]
    fn test_alt_engine_probes_first() {
        let dir = tempfile::tempdir().unwrap();
        let input = touch(dir.path(), "in.mp4");
        let runner = RecordingRunner::new();
        runner.add_success("format=duration", "4.0\n");
        let ctx = context(&dir, &runner);
        let args = ReverseArgs {
            input_file: input,
            output_file: None,
            use_alt_engine: true,
        };
        handle(args, &ctx).unwrap();
        let calls = runner.calls();
        assert_eq!(calls[0].program(), std::path::Path::new("ffprobe"));
        // probe, one chunk, concat
        assert_eq!(calls.len(), 3);
    }
}
