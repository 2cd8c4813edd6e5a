// vidtoolz-core/src/mocks.rs

// --- Recording runner (for testing) ---

// Always compiled so integration tests under tests/ and the CLI crate can
// drive the command builders without spawning ffmpeg.

use crate::command::ToolCommand;
use crate::error::{CoreError, CoreResult};
use crate::process::{ProcessOutput, ProcessRunner};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// A scripted response for the first call whose arguments contain `arg_pattern`.
pub struct RunnerExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<ProcessOutput>,
    pub create_dummy_output: bool,
}

/// Process runner that records every command instead of executing it.
///
/// Calls are matched against expectations by substring over the arguments;
/// an unmatched call succeeds with empty output.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    expectations: Rc<RefCell<Vec<RunnerExpectation>>>,
    received_calls: Rc<RefCell<Vec<(ToolCommand, Duration)>>>,
    launched: Rc<RefCell<Vec<ToolCommand>>>,
    dummy_outputs: Rc<Cell<bool>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Makes every successful call create an empty file at its last argument.
    #[must_use]
    pub fn with_dummy_outputs(self) -> Self {
        self.dummy_outputs.set(true);
        self
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<ProcessOutput>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(RunnerExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    /// Scripts a successful call printing `stdout`.
    pub fn add_success(&self, arg_pattern: &str, stdout: &str) {
        self.add_expectation(
            arg_pattern,
            Ok(ProcessOutput::from_parts("", 0, stdout.to_string(), "")),
            false,
        );
    }

    /// Scripts a call exiting with `exit_code` and `stderr`.
    pub fn add_exit_error(&self, arg_pattern: &str, exit_code: i32, stderr: &str) {
        self.add_expectation(
            arg_pattern,
            Ok(ProcessOutput::from_parts("", exit_code, String::new(), stderr)),
            false,
        );
    }

    pub fn add_timeout(&self, arg_pattern: &str) {
        self.add_expectation(arg_pattern, Ok(ProcessOutput::timed_out()), false);
    }

    pub fn add_spawn_error(&self, arg_pattern: &str, program: &str) {
        self.add_expectation(
            arg_pattern,
            Err(CoreError::CommandStart(
                program.to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            )),
            false,
        );
    }

    /// Commands passed to `run`, in call order.
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.received_calls.borrow().iter().map(|(cmd, _)| cmd.clone()).collect()
    }

    /// Timeouts passed to `run`, in call order.
    pub fn timeouts(&self) -> Vec<Duration> {
        self.received_calls.borrow().iter().map(|(_, t)| *t).collect()
    }

    /// Commands passed to `launch`, in call order.
    pub fn launches(&self) -> Vec<ToolCommand> {
        self.launched.borrow().clone()
    }

    /// Total number of processes that would have been spawned.
    pub fn spawn_count(&self) -> usize {
        self.received_calls.borrow().len() + self.launched.borrow().len()
    }

    fn take_expectation(&self, cmd: &ToolCommand) -> Option<RunnerExpectation> {
        let mut expectations = self.expectations.borrow_mut();
        let index = expectations.iter().position(|exp| {
            cmd.get_args().iter().any(|arg| arg.contains(&exp.arg_pattern))
        })?;
        Some(expectations.remove(index))
    }
}

fn create_dummy_output(cmd: &ToolCommand) {
    let Some(last) = cmd.get_args().last() else {
        log::warn!("RecordingRunner couldn't find an output path to create");
        return;
    };
    let output_path = PathBuf::from(last);
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("RecordingRunner failed to create {:?}: {}", parent, e);
        }
    }
    if let Err(e) = std::fs::File::create(&output_path) {
        log::error!("RecordingRunner failed to create dummy output {:?}: {}", output_path, e);
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, cmd: &ToolCommand, timeout: Duration) -> CoreResult<ProcessOutput> {
        self.received_calls.borrow_mut().push((cmd.clone(), timeout));

        let (result, dummy) = match self.take_expectation(cmd) {
            Some(exp) => {
                log::debug!("RecordingRunner: matched expectation '{}'", exp.arg_pattern);
                (exp.result, exp.create_dummy_output)
            }
            None => (Ok(ProcessOutput::from_parts("", 0, String::new(), "")), false),
        };

        // Scripted logs start with an empty command line; fill in the real one.
        let result = result.map(|output| {
            if output.is_timeout() {
                output
            } else {
                ProcessOutput {
                    log: format!("{}{}", cmd.display(), output.log),
                    ..output
                }
            }
        });

        if matches!(&result, Ok(output) if output.success())
            && (dummy || self.dummy_outputs.get())
        {
            create_dummy_output(cmd);
        }
        result
    }

    fn launch(&self, cmd: &ToolCommand) -> CoreResult<u32> {
        self.launched.borrow_mut().push(cmd.clone());
        Ok(4242)
    }
}
