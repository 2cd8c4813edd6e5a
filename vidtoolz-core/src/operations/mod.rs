// ============================================================================
// vidtoolz-core/src/operations/mod.rs
// ============================================================================
//
// COMMAND BUILDERS: One module per media operation
//
// Every builder follows the same shape:
//   1. check that its input file(s) exist
//   2. derive the output path when none was given
//   3. validate and normalize parameters
//   4. assemble a `ToolCommand` (argument vector, no shell)
//   5. run it through the `ProcessRunner` held by the `Toolkit`
//   6. return an `Outcome` (exit code, combined log, output path)
//
// The `build_*_command` functions are pure and exposed separately so the
// exact argument vectors can be tested without a runner.

pub mod clip;
pub mod concat;
pub mod info;
pub mod overlay;
pub mod play;
pub mod reverse;
pub mod scale;
pub mod setup;
pub mod speed;

use std::path::{Path, PathBuf};

use crate::command::{Tool, ToolCommand};
use crate::config::{DEFAULT_OUTPUT_EXTENSION, Operation, ToolkitConfig};
use crate::error::{CoreError, CoreResult};
use crate::process::{ProcessOutput, ProcessRunner};

/// Result of a builder: the `(exit_code, log, output_path)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub exit_code: i32,
    pub log: String,
    pub output_path: PathBuf,
}

impl Outcome {
    #[must_use]
    pub fn from_process(output: ProcessOutput, output_path: PathBuf) -> Self {
        Self {
            exit_code: output.exit_code,
            log: output.log,
            output_path,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Collapses an error into the `(-1, message, "")` form.
impl From<CoreError> for Outcome {
    fn from(err: CoreError) -> Self {
        Self {
            exit_code: -1,
            log: err.to_string(),
            output_path: PathBuf::new(),
        }
    }
}

/// Everything a builder needs: the runner that executes commands and the
/// configuration that resolves binaries and timeouts.
#[derive(Clone, Copy)]
pub struct Toolkit<'a> {
    runner: &'a dyn ProcessRunner,
    config: &'a ToolkitConfig,
}

impl<'a> Toolkit<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, config: &'a ToolkitConfig) -> Self {
        Self { runner, config }
    }

    #[must_use]
    pub fn config(&self) -> &'a ToolkitConfig {
        self.config
    }

    #[must_use]
    pub fn runner(&self) -> &'a dyn ProcessRunner {
        self.runner
    }

    /// A fresh command for `tool`.
    #[must_use]
    pub fn command(&self, tool: Tool) -> ToolCommand {
        ToolCommand::for_tool(tool, self.config)
    }

    /// Runs `cmd` with the timeout configured for `op`.
    pub fn run(&self, cmd: &ToolCommand, op: Operation) -> CoreResult<ProcessOutput> {
        self.runner.run(cmd, self.config.timeout_for(op))
    }

    /// Runs `cmd` and wraps the result as an [`Outcome`] for `output_path`.
    pub fn execute(
        &self,
        cmd: &ToolCommand,
        op: Operation,
        output_path: PathBuf,
    ) -> CoreResult<Outcome> {
        let output = self.run(cmd, op)?;
        if output.is_timeout() {
            log::warn!("{:?} timed out for {}", op, output_path.display());
        }
        Ok(Outcome::from_process(output, output_path))
    }
}

/// Fails with `InputNotFound` unless `path` exists.
pub fn ensure_exists(path: &Path) -> CoreResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CoreError::InputNotFound(path.to_path_buf()))
    }
}

/// `{dir}/{stem}_{suffix}.{ext}`, keeping the input's extension (mp4 if none).
#[must_use]
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTPUT_EXTENSION.to_string());
    input.with_file_name(format!("{stem}_{suffix}.{ext}"))
}

/// The explicit output if given, otherwise the derived default.
#[must_use]
pub fn resolve_output(input: &Path, output: Option<&Path>, suffix: &str) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input, suffix))
}
