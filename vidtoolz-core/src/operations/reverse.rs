// ============================================================================
// vidtoolz-core/src/operations/reverse.rs
// ============================================================================
//
// REVERSE: Play a video backwards
//
// Two engines:
//
// - `Filter` (default): one ffmpeg call with `reverse`/`areverse`. Fast, but
//   ffmpeg buffers the whole clip in memory.
// - `Segmented`: probes the duration, reverses fixed-length chunks one at a
//   time into a temporary directory, then stream-copies the chunks back
//   together in reverse order. Slower, but memory use is bounded by the
//   chunk length.

use std::path::{Path, PathBuf};

use super::concat::{build_fast_concat_command, write_manifest};
use super::{Outcome, Toolkit, ensure_exists, resolve_output};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};
use crate::time::format_seconds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseEngine {
    #[default]
    Filter,
    Segmented,
}

/// `ffmpeg [-ss S -t T] -i INPUT -vf reverse -af areverse -y OUTPUT`
#[must_use]
pub fn build_reverse_command(
    base: ToolCommand,
    input: &Path,
    output: &Path,
    window: Option<(f64, f64)>,
) -> ToolCommand {
    let cmd = match window {
        Some((start, length)) => base
            .option("-ss", format_seconds(start))
            .option("-t", format_seconds(length)),
        None => base,
    };
    cmd.input(input)
        .option("-vf", "reverse")
        .option("-af", "areverse")
        .overwrite_output(output)
}

/// `ffprobe -v error -show_entries format=duration -of default=noprint_wrappers=1:nokey=1 INPUT`
#[must_use]
pub fn build_duration_probe(base: ToolCommand, input: &Path) -> ToolCommand {
    base.option("-v", "error")
        .option("-show_entries", "format=duration")
        .option("-of", "default=noprint_wrappers=1:nokey=1")
        .path(input)
}

/// Container duration in seconds, read through ffprobe.
pub fn probe_duration(toolkit: &Toolkit<'_>, input: &Path) -> CoreResult<f64> {
    let cmd = build_duration_probe(toolkit.command(Tool::Ffprobe), input);
    let output = toolkit.run(&cmd, Operation::Probe)?;
    if !output.success() {
        return Err(CoreError::OperationFailed(format!(
            "ffprobe could not read the duration of {} (exit code {})",
            input.display(),
            output.exit_code
        )));
    }
    let text = output.stdout.trim();
    text.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| {
            CoreError::OperationFailed(format!(
                "Unexpected duration '{}' reported for {}",
                text,
                input.display()
            ))
        })
}

/// `(start, length)` windows covering `duration` in `chunk`-second pieces.
#[must_use]
pub fn chunk_windows(duration: f64, chunk: f64) -> Vec<(f64, f64)> {
    if !(chunk.is_finite() && chunk > 0.0) {
        return vec![(0.0, duration)];
    }
    let mut windows = Vec::new();
    let mut start = 0.0;
    while start < duration {
        let length = chunk.min(duration - start);
        windows.push((start, length));
        start += chunk;
    }
    windows
}

pub fn reverse_video(
    toolkit: &Toolkit<'_>,
    input: &Path,
    output: Option<&Path>,
    engine: ReverseEngine,
) -> CoreResult<Outcome> {
    ensure_exists(input)?;
    let output = resolve_output(input, output, "reversed");
    match engine {
        ReverseEngine::Filter => {
            let cmd = build_reverse_command(toolkit.command(Tool::Ffmpeg), input, &output, None);
            toolkit.execute(&cmd, Operation::Reverse, output)
        }
        ReverseEngine::Segmented => reverse_segmented(toolkit, input, output),
    }
}

fn reverse_segmented(toolkit: &Toolkit<'_>, input: &Path, output: PathBuf) -> CoreResult<Outcome> {
    let duration = probe_duration(toolkit, input)?;
    let windows = chunk_windows(duration, toolkit.config().reverse_chunk_secs);
    log::debug!(
        "Reversing {} in {} chunks of up to {}s",
        input.display(),
        windows.len(),
        toolkit.config().reverse_chunk_secs
    );

    let scratch = tempfile::Builder::new()
        .prefix("vidtoolz_reverse_")
        .tempdir_in(toolkit.config().scratch_dir())?;
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::config::DEFAULT_OUTPUT_EXTENSION.to_string());

    let mut chunks = Vec::with_capacity(windows.len());
    let mut log = String::new();
    for (index, window) in windows.into_iter().enumerate() {
        let chunk_path = scratch.path().join(format!("chunk_{index:04}.{ext}"));
        let cmd = build_reverse_command(
            toolkit.command(Tool::Ffmpeg),
            input,
            &chunk_path,
            Some(window),
        );
        let result = toolkit.run(&cmd, Operation::Reverse)?;
        if !result.success() {
            return Ok(Outcome::from_process(result, output));
        }
        log.push_str(&result.log);
        log.push('\n');
        chunks.push(chunk_path);
    }

    chunks.reverse();
    let manifest = write_manifest(scratch.path(), &chunks)?;
    let cmd = build_fast_concat_command(toolkit.command(Tool::Ffmpeg), manifest.path(), &output);
    let result = toolkit.run(&cmd, Operation::Concat)?;
    log.push_str(&result.log);

    Ok(Outcome {
        exit_code: result.exit_code,
        log,
        output_path: output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_reverse_args() {
        let cmd = build_reverse_command(
            ToolCommand::new("ffmpeg"),
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            None,
        );
        assert_eq!(
            cmd.get_args(),
            ["-i", "in.mp4", "-vf", "reverse", "-af", "areverse", "-y", "out.mp4"]
        );
    }

    #[test]
    fn test_chunk_windows_cover_duration() {
        assert_eq!(
            chunk_windows(25.0, 10.0),
            vec![(0.0, 10.0), (10.0, 10.0), (20.0, 5.0)]
        );
        assert_eq!(chunk_windows(10.0, 10.0), vec![(0.0, 10.0)]);
        assert!(chunk_windows(0.0, 10.0).is_empty());
    }

    #[test]
    fn test_duration_probe_args() {
        let cmd = build_duration_probe(ToolCommand::new("ffprobe"), Path::new("a b.mp4"));
        assert_eq!(cmd.value_of("-show_entries"), Some("format=duration"));
        assert_eq!(cmd.get_args().last().map(String::as_str), Some("a b.mp4"));
    }
}
