//! Locating the media tools and fetching a static ffmpeg build.

use std::path::PathBuf;

use super::Toolkit;
use crate::command::Tool;
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};

/// What was found for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: PathBuf,
    /// First line of `-version`, or `None` when the tool is unusable.
    pub version: Option<String>,
}

impl ToolStatus {
    #[must_use]
    pub fn available(&self) -> bool {
        self.version.is_some()
    }
}

/// Runs `<tool> -version` and returns the first line of its output.
pub fn check_dependency(toolkit: &Toolkit<'_>, tool: Tool) -> CoreResult<String> {
    let cmd = toolkit.command(tool).arg("-version");
    let output = toolkit.run(&cmd, Operation::Probe).map_err(|e| match e {
        CoreError::CommandStart(_, ref io) if io.kind() == std::io::ErrorKind::NotFound => {
            CoreError::DependencyNotFound(tool.name().to_string())
        }
        other => other,
    })?;
    if !output.success() {
        return Err(CoreError::DependencyNotFound(tool.name().to_string()));
    }
    let version = output.stdout.lines().next().unwrap_or_default().trim().to_string();
    log::debug!("Found {}: {}", tool, version);
    Ok(version)
}

/// Status of ffmpeg, ffprobe and ffplay in that order.
#[must_use]
pub fn check_tools(toolkit: &Toolkit<'_>) -> Vec<ToolStatus> {
    [Tool::Ffmpeg, Tool::Ffprobe, Tool::Ffplay]
        .into_iter()
        .map(|tool| {
            let version = match check_dependency(toolkit, tool) {
                Ok(version) => Some(version),
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            };
            ToolStatus {
                tool,
                path: tool.resolve(toolkit.config()),
                version,
            }
        })
        .collect()
}

/// Downloads a static ffmpeg build into the sidecar directory (next to the
/// running executable) unless one is already usable. Returns the ffmpeg path.
pub fn download_ffmpeg() -> CoreResult<PathBuf> {
    log::info!("Checking for a usable ffmpeg installation");
    ffmpeg_sidecar::download::auto_download().map_err(|e| CoreError::Download(e.to_string()))?;
    let path = ffmpeg_sidecar::paths::ffmpeg_path();
    log::info!("ffmpeg available at {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolkitConfig;
    use crate::mocks::RecordingRunner;

    #[test]
    fn test_check_dependency_reads_first_line() {
        let runner = RecordingRunner::new();
        runner.add_success("-version", "ffmpeg version 7.0 Copyright\nbuilt with gcc\n");
        let config = ToolkitConfig::default();
        let toolkit = Toolkit::new(&runner, &config);
        assert_eq!(
            check_dependency(&toolkit, Tool::Ffmpeg).unwrap(),
            "ffmpeg version 7.0 Copyright"
        );
    }

    #[test]
    fn test_missing_binary_is_dependency_not_found() {
        let runner = RecordingRunner::new();
        runner.add_spawn_error("-version", "ffplay");
        let config = ToolkitConfig::default();
        let toolkit = Toolkit::new(&runner, &config);
        let err = check_dependency(&toolkit, Tool::Ffplay).unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(name) if name == "ffplay"));
    }

    #[test]
    fn test_check_tools_reports_each_tool() {
        let runner = RecordingRunner::new();
        runner.add_exit_error("-version", 1, "");
        let mut config = ToolkitConfig::default();
        config.ffmpeg_path = Some(PathBuf::from("/opt/ffmpeg"));
        let toolkit = Toolkit::new(&runner, &config);
        let statuses = check_tools(&toolkit);
        assert_eq!(statuses.len(), 3);
        assert!(!statuses[0].available());
        assert_eq!(statuses[0].path, PathBuf::from("/opt/ffmpeg"));
        assert!(statuses[1].available());
    }
}
