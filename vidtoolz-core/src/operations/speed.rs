//! Change playback speed.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::{Outcome, Toolkit, ensure_exists, resolve_output};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};
use crate::filters::{FilterChain, FilterGraph};

pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 10.0;

/// What happens to the soundtrack when the picture is re-timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioMode {
    /// Audio tempo follows the picture.
    #[default]
    Adjust,
    /// Audio is dropped.
    Mute,
    /// Audio is copied untouched and keeps its original length.
    Keep,
}

impl AudioMode {
    pub const ALL: [AudioMode; 3] = [AudioMode::Adjust, AudioMode::Mute, AudioMode::Keep];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AudioMode::Adjust => "adjust",
            AudioMode::Mute => "mute",
            AudioMode::Keep => "keep",
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidInput(format!("Unknown audio mode '{s}'")))
    }
}

/// Rejects factors outside `[0.1, 10.0]`.
pub fn validate_speed(factor: f64) -> CoreResult<f64> {
    if factor.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&factor) {
        Ok(factor)
    } else {
        Err(CoreError::InvalidInput(
            "Speed must be between 0.1 and 10.0.".to_string(),
        ))
    }
}

/// `atempo` stages multiplying to `factor`, each within `[0.5, 2.0]`.
#[must_use]
pub fn atempo_chain(factor: f64) -> FilterChain {
    let mut remaining = factor;
    let mut chain = FilterChain::new();
    while remaining > 2.0 {
        chain = chain.add("atempo=2");
        remaining /= 2.0;
    }
    while remaining < 0.5 {
        chain = chain.add("atempo=0.5");
        remaining /= 0.5;
    }
    chain.add(format!("atempo={remaining}"))
}

/// Builds the re-timing command for `factor` and `mode`.
pub fn build_speed_command(
    base: ToolCommand,
    input: &Path,
    output: &Path,
    factor: f64,
    mode: AudioMode,
) -> CoreResult<ToolCommand> {
    let factor = validate_speed(factor)?;
    let video = FilterChain::new().add(format!("setpts=PTS/{factor}"));

    let cmd = base.input(input);
    let cmd = match mode {
        AudioMode::Adjust => {
            let graph = FilterGraph::new()
                .chain(&["0:v"], video, &["v"])
                .chain(&["0:a"], atempo_chain(factor), &["a"])
                .build();
            cmd.option("-filter_complex", graph)
                .option("-map", "[v]")
                .option("-map", "[a]")
        }
        AudioMode::Mute => {
            let graph = FilterGraph::new().chain(&["0:v"], video, &["v"]).build();
            cmd.option("-filter_complex", graph)
                .option("-map", "[v]")
                .arg("-an")
        }
        AudioMode::Keep => {
            let graph = FilterGraph::new().chain(&["0:v"], video, &["v"]).build();
            cmd.option("-filter_complex", graph)
                .option("-map", "[v]")
                .option("-map", "0:a?")
                .option("-c:a", "copy")
        }
    };
    Ok(cmd.overwrite_output(output))
}

/// Validates the factor before touching the filesystem or spawning anything.
pub fn change_video_speed(
    toolkit: &Toolkit<'_>,
    input: &Path,
    output: Option<&Path>,
    factor: f64,
    mode: AudioMode,
) -> CoreResult<Outcome> {
    validate_speed(factor)?;
    ensure_exists(input)?;
    let output = resolve_output(input, output, "speed");
    let cmd = build_speed_command(toolkit.command(Tool::Ffmpeg), input, &output, factor, mode)?;
    toolkit.execute(&cmd, Operation::Speed, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(factor: f64) -> String {
        atempo_chain(factor).build().unwrap_or_default()
    }

    #[test]
    fn test_atempo_stages_stay_in_range() {
        assert_eq!(chain(1.5), "atempo=1.5");
        assert_eq!(chain(2.0), "atempo=2");
        assert_eq!(chain(3.0), "atempo=2,atempo=1.5");
        assert_eq!(chain(10.0), "atempo=2,atempo=2,atempo=2,atempo=1.25");
        assert_eq!(chain(0.25), "atempo=0.5,atempo=0.5");
        assert_eq!(chain(0.1), "atempo=0.5,atempo=0.5,atempo=0.5,atempo=0.8");

        for factor in [0.1, 0.15, 0.3, 0.5, 0.99, 1.0, 2.5, 4.0, 7.3, 10.0] {
            let stages: Vec<f64> = chain(factor)
                .split(',')
                .map(|s| s.trim_start_matches("atempo=").parse().unwrap())
                .collect();
            assert!(
                stages.iter().all(|s| (0.5..=2.0).contains(s)),
                "{factor}: {stages:?}"
            );
            let product: f64 = stages.iter().product();
            assert!((product - factor).abs() < 1e-9, "{factor}: {product}");
        }
    }

    #[test]
    fn test_speed_bounds() {
        assert!(validate_speed(0.1).is_ok());
        assert!(validate_speed(10.0).is_ok());
        let err = validate_speed(11.0).unwrap_err();
        assert_eq!(err.to_string(), "Speed must be between 0.1 and 10.0.");
        assert!(validate_speed(0.05).is_err());
        assert!(validate_speed(f64::NAN).is_err());
    }

    fn args(mode: AudioMode) -> Vec<String> {
        build_speed_command(
            ToolCommand::new("ffmpeg"),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            2.0,
            mode,
        )
        .unwrap()
        .get_args()
        .to_vec()
    }

    #[test]
    fn test_adjust_retimes_both_streams() {
        let args = args(AudioMode::Adjust);
        assert!(args.contains(&"[0:v]setpts=PTS/2[v];[0:a]atempo=2[a]".to_string()));
        assert!(!args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_mute_drops_audio() {
        let args = args(AudioMode::Mute);
        assert!(args.contains(&"[0:v]setpts=PTS/2[v]".to_string()));
        assert!(args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_keep_copies_audio_untouched() {
        let args = args(AudioMode::Keep);
        assert!(args.contains(&"[0:v]setpts=PTS/2[v]".to_string()));
        assert!(args.windows(2).any(|w| w == ["-c:a", "copy"]));
        assert!(args.windows(2).any(|w| w == ["-map", "0:a?"]));
        assert!(!args.iter().any(|a| a.contains("atempo")));
    }

    #[test]
    fn test_audio_mode_parsing() {
        assert_eq!("keep".parse::<AudioMode>().unwrap(), AudioMode::Keep);
        assert_eq!("MUTE".parse::<AudioMode>().unwrap(), AudioMode::Mute);
        assert!("loud".parse::<AudioMode>().is_err());
    }
}
