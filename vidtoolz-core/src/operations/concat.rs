//! Join several videos end to end.
//!
//! The fast path writes a concat-demuxer manifest and stream-copies; it only
//! works when every input shares codecs and parameters. The slow path
//! decodes everything through the `concat` filter and re-encodes.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{Outcome, Toolkit, ensure_exists};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};
use crate::filters::FilterGraph;

/// `{dir}/{stem}_merged.mp4` next to the first input.
#[must_use]
pub fn default_concat_output(first: &Path) -> PathBuf {
    let stem = first
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    first.with_file_name(format!("{stem}_merged.mp4"))
}

/// Reads a list file: one path per line, blank lines skipped.
pub fn read_input_list(list: &Path) -> CoreResult<Vec<PathBuf>> {
    ensure_exists(list)?;
    let contents = std::fs::read_to_string(list)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Manifest text for the concat demuxer, one `file '<absolute path>'` per line.
pub fn manifest_contents(inputs: &[PathBuf]) -> CoreResult<String> {
    let mut manifest = String::new();
    for input in inputs {
        let absolute = std::path::absolute(input)?;
        let quoted = absolute.to_string_lossy().replace('\'', r"'\''");
        manifest.push_str(&format!("file '{quoted}'\n"));
    }
    Ok(manifest)
}

/// Writes the manifest to a temporary file removed when the handle drops.
pub fn write_manifest(scratch_dir: &Path, inputs: &[PathBuf]) -> CoreResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("vidtoolz_concat_")
        .suffix(".txt")
        .tempfile_in(scratch_dir)?;
    file.write_all(manifest_contents(inputs)?.as_bytes())?;
    file.flush()?;
    log::debug!("Wrote concat manifest {}", file.path().display());
    Ok(file)
}

/// `ffmpeg -f concat -safe 0 -i LIST -c copy -y OUTPUT`
#[must_use]
pub fn build_fast_concat_command(base: ToolCommand, manifest: &Path, output: &Path) -> ToolCommand {
    base.option("-f", "concat")
        .option("-safe", "0")
        .input(manifest)
        .option("-c", "copy")
        .overwrite_output(output)
}

/// `ffmpeg -i A -i B ... -filter_complex [0:v][0:a][1:v][1:a]concat=n=N:v=1:a=1[vout][aout] ...`
#[must_use]
pub fn build_filter_concat_command(base: ToolCommand, inputs: &[PathBuf], output: &Path) -> ToolCommand {
    let pads: Vec<String> = (0..inputs.len())
        .flat_map(|i| [format!("{i}:v"), format!("{i}:a")])
        .collect();
    let pad_refs: Vec<&str> = pads.iter().map(String::as_str).collect();
    let graph = FilterGraph::new()
        .node(
            &pad_refs,
            format!("concat=n={}:v=1:a=1", inputs.len()),
            &["vout", "aout"],
        )
        .build();

    inputs
        .iter()
        .fold(base, |cmd, input| cmd.input(input))
        .option("-filter_complex", graph)
        .option("-map", "[vout]")
        .option("-map", "[aout]")
        .overwrite_output(output)
}

/// Concatenates `inputs` in order. Every input is checked before anything
/// is spawned; the first missing one is reported.
pub fn concat_videos(
    toolkit: &Toolkit<'_>,
    inputs: &[PathBuf],
    output: Option<&Path>,
    fast: bool,
) -> CoreResult<Outcome> {
    let first = inputs
        .first()
        .ok_or_else(|| CoreError::InvalidInput("No input files provided.".to_string()))?;
    for input in inputs {
        ensure_exists(input)?;
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_concat_output(first));
    log::debug!(
        "Concatenating {} inputs ({}) into {}",
        inputs.len(),
        if fast { "stream copy" } else { "filter" },
        output.display()
    );

    if fast {
        let manifest = write_manifest(&toolkit.config().scratch_dir(), inputs)?;
        let cmd = build_fast_concat_command(toolkit.command(Tool::Ffmpeg), manifest.path(), &output);
        toolkit.execute(&cmd, Operation::Concat, output)
    } else {
        let cmd = build_filter_concat_command(toolkit.command(Tool::Ffmpeg), inputs, &output);
        toolkit.execute(&cmd, Operation::Concat, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_always_mp4() {
        assert_eq!(
            default_concat_output(Path::new("/v/a.mkv")),
            PathBuf::from("/v/a_merged.mp4")
        );
    }

    #[test]
    fn test_manifest_uses_absolute_quoted_paths() {
        let inputs = vec![PathBuf::from("/clips/one.mp4"), PathBuf::from("/clips/it's.mp4")];
        let manifest = manifest_contents(&inputs).unwrap();
        assert_eq!(manifest, "file '/clips/one.mp4'\nfile '/clips/it'\\''s.mp4'\n");
    }

    #[test]
    fn test_manifest_resolves_relative_paths() {
        let manifest = manifest_contents(&[PathBuf::from("rel.mp4")]).unwrap();
        let line = manifest.trim_end();
        assert!(line.starts_with("file '"));
        assert!(Path::new(&line[6..line.len() - 1]).is_absolute());
    }

    #[test]
    fn test_filter_concat_graph() {
        let inputs = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
        let cmd = build_filter_concat_command(ToolCommand::new("ffmpeg"), &inputs, Path::new("o.mp4"));
        assert_eq!(cmd.value_of("-filter_complex"),
            Some("[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[vout][aout]"));
        assert_eq!(&cmd.get_args()[..4], ["-i", "a.mp4", "-i", "b.mp4"]);
    }

    #[test]
    fn test_fast_concat_args() {
        let cmd = build_fast_concat_command(
            ToolCommand::new("ffmpeg"),
            Path::new("/tmp/list.txt"),
            Path::new("o.mp4"),
        );
        assert_eq!(
            cmd.get_args(),
            ["-f", "concat", "-safe", "0", "-i", "/tmp/list.txt", "-c", "copy", "-y", "o.mp4"]
        );
    }

    #[test]
    fn test_read_input_list_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.txt");
        std::fs::write(&list, "a.mp4\n\n  b.mp4  \n").unwrap();
        assert_eq!(
            read_input_list(&list).unwrap(),
            vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]
        );
    }
}
