// ============================================================================
// vidtoolz-cli/src/providers/mod.rs
// ============================================================================
//
// BUILT-IN PROVIDERS: The commands shipped inside the binary
//
// Each submodule defines the clap arguments for one command, a `register`
// function that adds it to the namespace, and the handler that calls the
// matching core builder and reports the result.
//
// Reporting follows one policy for every builder:
// - success:           "<what happened> and saved to <path>"
// - process failure:   "<error> Return code: N", the tool name, then its log
// - user error:        "Error: <message>" (missing file, bad value)
// - anything else:     "An error occurred: <message>"
//
// None of these change the exit status.

pub mod clip;
pub mod concat;
pub mod info;
pub mod overlay;
pub mod play;
pub mod reverse;
pub mod scale;
pub mod speed;

use std::path::PathBuf;

use vidtoolz_core::{CoreError, CoreResult, Outcome};

use crate::error::CliResult;
use crate::registry::{CommandProvider, Subcommands};
use crate::terminal;

/// Prefix of every built-in provider name.
pub const BUILTIN_PREFIX: &str = "vidtoolz.builtin.";

type RegisterFn = fn(&mut Subcommands) -> CliResult<()>;

/// A provider compiled into the binary.
pub struct BuiltinProvider {
    name: String,
    register: RegisterFn,
}

impl BuiltinProvider {
    fn new(short_name: &str, register: RegisterFn) -> Self {
        Self {
            name: format!("{BUILTIN_PREFIX}{short_name}"),
            register,
        }
    }
}

impl CommandProvider for BuiltinProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn register_commands(&self, subcommands: &mut Subcommands) -> CliResult<()> {
        (self.register)(subcommands)
    }
}

/// Built-in providers in registration order.
#[must_use]
pub fn builtin_providers() -> Vec<Box<dyn CommandProvider>> {
    vec![
        Box::new(BuiltinProvider::new("clip", clip::register)),
        Box::new(BuiltinProvider::new("scale", scale::register)),
        Box::new(BuiltinProvider::new("overlay", overlay::register)),
        Box::new(BuiltinProvider::new("concat", concat::register)),
        Box::new(BuiltinProvider::new("reverse", reverse::register)),
        Box::new(BuiltinProvider::new("speed", speed::register)),
        Box::new(BuiltinProvider::new("info", info::register)),
        Box::new(BuiltinProvider::new("play", play::register)),
    ]
}

/// Wording used when reporting one command's result.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    /// e.g. "Video clipped"
    pub done: &'static str,
    /// e.g. "Error clipping video"
    pub failed: &'static str,
    /// Tool whose output is shown on failure, e.g. "FFmpeg"
    pub tool: &'static str,
}

pub(crate) const FFMPEG: &str = "FFmpeg";
pub(crate) const FFPROBE: &str = "FFprobe";
pub(crate) const FFPLAY: &str = "FFplay";

/// What a handler tells the user about a builder result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Saved(PathBuf),
    ProcessFailed { exit_code: i32, log: String },
    UserError(String),
    Unexpected(String),
}

impl Report {
    #[must_use]
    pub fn from_result(result: CoreResult<Outcome>) -> Self {
        match result {
            Ok(outcome) if outcome.success() => Report::Saved(outcome.output_path),
            Ok(outcome) => Report::ProcessFailed {
                exit_code: outcome.exit_code,
                log: outcome.log,
            },
            Err(e) => Report::from_error(&e),
        }
    }

    #[must_use]
    pub fn from_error(err: &CoreError) -> Self {
        if err.is_user_error() {
            Report::UserError(err.to_string())
        } else {
            Report::Unexpected(err.to_string())
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Report::Saved(_))
    }

    /// Lines printed for this report, in order.
    #[must_use]
    pub fn lines(&self, messages: &Messages) -> Vec<String> {
        match self {
            Report::Saved(path) => vec![format!("{} and saved to {}", messages.done, path.display())],
            Report::ProcessFailed { exit_code, log } => vec![
                format!("{}. Return code: {}", messages.failed, exit_code),
                format!("{} output:", messages.tool),
                log.clone(),
            ],
            Report::UserError(message) => vec![format!("Error: {message}")],
            Report::Unexpected(message) => vec![format!("An error occurred: {message}")],
        }
    }

    pub fn print(&self, messages: &Messages) {
        let lines = self.lines(messages);
        match self {
            Report::Saved(_) => lines.iter().for_each(|l| terminal::print_success(l)),
            Report::ProcessFailed { .. } => {
                if let Some((first, rest)) = lines.split_first() {
                    terminal::print_error(first);
                    rest.iter().for_each(|l| terminal::print_block(l));
                }
            }
            Report::UserError(_) | Report::Unexpected(_) => {
                lines.iter().for_each(|l| terminal::print_error(l))
            }
        }
    }
}

/// Reports a builder result. Handlers always succeed; the report is the result.
pub(crate) fn report(result: CoreResult<Outcome>, messages: &Messages) -> CliResult<()> {
    let report = Report::from_result(result);
    if !report.is_success() {
        log::debug!("{} failed: {:?}", messages.done, report);
    }
    report.print(messages);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;
    use vidtoolz_core::ToolkitConfig;
    use vidtoolz_core::mocks::RecordingRunner;

    use crate::config::DiscoveryConfig;
    use crate::context::AppContext;

    /// Context over a recording runner with bare tool names and no external plugins.
    pub fn context(dir: &TempDir, runner: &RecordingRunner) -> AppContext {
        let mut config = ToolkitConfig::default();
        config.ffmpeg_path = Some(PathBuf::from("ffmpeg"));
        config.ffprobe_path = Some(PathBuf::from("ffprobe"));
        config.ffplay_path = Some(PathBuf::from("ffplay"));
        config.temp_dir = Some(dir.path().to_path_buf());
        let discovery = DiscoveryConfig {
            external_enabled: false,
            ..DiscoveryConfig::default()
        };
        AppContext::new(config, Box::new(runner.clone()), discovery)
    }

    pub fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"video").unwrap();
        path
    }
}
