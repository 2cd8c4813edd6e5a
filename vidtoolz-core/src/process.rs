// ============================================================================
// vidtoolz-core/src/process.rs
// ============================================================================
//
// PROCESS RUNNER: Synchronous execution of external tools with a timeout
//
// The runner executes one `ToolCommand` at a time, captures stdout and stderr
// on helper threads and folds them into a single log string:
//
//     <rendered command>\n<stdout>\n<stderr>
//
// A non-zero exit is a normal result, not an error. A timeout kills and reaps
// the child and yields the sentinel exit code -1 with "Process timed out".
// Only failing to start the program is reported as `CoreError`.

use std::io::Read;
use std::process::{Child, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::command::ToolCommand;
use crate::error::{CoreError, CoreResult, command_start_error};

/// Exit code reported when a process was killed for exceeding its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Log text reported when a process was killed for exceeding its timeout.
pub const TIMEOUT_LOG: &str = "Process timed out";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of one process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code of the process, or [`TIMEOUT_EXIT_CODE`]
    pub exit_code: i32,
    /// Command line, stdout and stderr joined by newlines
    pub log: String,
    /// Captured stdout on its own, for callers that parse tool output
    pub stdout: String,
}

impl ProcessOutput {
    /// Assembles the combined log for a finished command.
    #[must_use]
    pub fn from_parts(command: &str, exit_code: i32, stdout: String, stderr: &str) -> Self {
        Self {
            exit_code,
            log: format!("{command}\n{stdout}\n{stderr}"),
            stdout,
        }
    }

    /// The synthetic result of a timed-out invocation.
    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            exit_code: TIMEOUT_EXIT_CODE,
            log: TIMEOUT_LOG.to_string(),
            stdout: String::new(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.exit_code == TIMEOUT_EXIT_CODE && self.log == TIMEOUT_LOG
    }
}

/// Executes tool commands. Implemented by [`SystemRunner`] for real processes
/// and by [`crate::mocks::RecordingRunner`] in tests.
pub trait ProcessRunner {
    /// Runs `cmd` to completion or until `timeout` elapses.
    fn run(&self, cmd: &ToolCommand, timeout: Duration) -> CoreResult<ProcessOutput>;

    /// Starts `cmd` without waiting for it and returns its process id.
    fn launch(&self, cmd: &ToolCommand) -> CoreResult<u32>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand, timeout: Duration) -> CoreResult<ProcessOutput> {
        let rendered = cmd.display();
        let program = program_name(cmd);
        log::debug!("Executing command (timeout {}s): {}", timeout.as_secs(), rendered);

        let mut std_cmd = cmd.to_std();
        let mut child = std_cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(program.clone(), e))?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let status = wait_with_timeout(&mut child, timeout, &program)?;

        // Pipes are closed once the child is gone, so the readers finish.
        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        match status {
            Some(status) => {
                let exit_code = status.code().unwrap_or(TIMEOUT_EXIT_CODE);
                if exit_code != 0 {
                    log::debug!("{} exited with code {}", program, exit_code);
                }
                Ok(ProcessOutput::from_parts(&rendered, exit_code, stdout, &stderr))
            }
            None => Ok(ProcessOutput::timed_out()),
        }
    }

    fn launch(&self, cmd: &ToolCommand) -> CoreResult<u32> {
        log::debug!("Launching detached command: {}", cmd.display());
        let mut std_cmd = cmd.to_std();
        let child = std_cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| command_start_error(program_name(cmd), e))?;
        Ok(child.id())
    }
}

fn program_name(cmd: &ToolCommand) -> String {
    cmd.program()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.program().to_string_lossy().into_owned())
}

fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("Failed to read child output: {}", e);
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Waits for the child; on timeout kills and reaps it and returns `None`.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    program: &str,
) -> CoreResult<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if start.elapsed() >= timeout => {
                log::warn!(
                    "{} exceeded its {}s timeout, killing pid {}",
                    program,
                    timeout.as_secs(),
                    child.id()
                );
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill {}: {}", program, e);
                }
                child
                    .wait()
                    .map_err(|e| CoreError::CommandWait(program.to_string(), e))?;
                return Ok(None);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(CoreError::CommandWait(program.to_string(), e)),
        }
    }
}
