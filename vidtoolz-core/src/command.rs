//! Command-line construction for the external media tools.
//!
//! Commands are assembled as a program path plus a vector of discrete
//! arguments and are executed without a shell, so paths with spaces or shell
//! metacharacters reach ffmpeg untouched. Quoting only happens in
//! [`ToolCommand::display`] when a command is rendered for logs.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ToolkitConfig;

/// The external binaries vidtoolz drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Encoder
    Ffmpeg,
    /// Stream prober
    Ffprobe,
    /// Interactive player
    Ffplay,
}

impl Tool {
    /// Executable base name of the tool.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
            Tool::Ffplay => "ffplay",
        }
    }

    /// Resolves the executable for this tool.
    ///
    /// Explicit overrides from the configuration win. Otherwise ffmpeg-sidecar's
    /// lookup is used: a binary in the sidecar directory next to the running
    /// executable, falling back to the bare name resolved through `PATH`.
    #[must_use]
    pub fn resolve(self, config: &ToolkitConfig) -> PathBuf {
        if let Some(path) = config.binary_override(self) {
            return path.to_path_buf();
        }
        match self {
            Tool::Ffmpeg => ffmpeg_sidecar::paths::ffmpeg_path(),
            Tool::Ffprobe => ffmpeg_sidecar::ffprobe::ffprobe_path(),
            Tool::Ffplay => sidecar_binary(self.name()),
        }
    }
}

fn sidecar_binary(name: &str) -> PathBuf {
    let file_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    ffmpeg_sidecar::paths::sidecar_dir()
        .ok()
        .map(|dir| dir.join(&file_name))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(name))
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully formed invocation of one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Starts a command for an arbitrary program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Starts a command for one of the media tools, resolved through `config`.
    ///
    /// ffmpeg and ffprobe get `-hide_banner` so the captured log stays short.
    #[must_use]
    pub fn for_tool(tool: Tool, config: &ToolkitConfig) -> Self {
        let mut cmd = Self::new(tool.resolve(config));
        if matches!(tool, Tool::Ffmpeg | Tool::Ffprobe) {
            cmd = cmd.arg("-hide_banner");
        }
        cmd
    }

    /// Appends a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends an option followed by its value.
    #[must_use]
    pub fn option(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    /// Appends a path argument.
    #[must_use]
    pub fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Adds `-i <path>`.
    #[must_use]
    pub fn input(self, path: &Path) -> Self {
        self.arg("-i").path(path)
    }

    /// Adds `-y <path>`, the last arguments of every encoder command.
    #[must_use]
    pub fn overwrite_output(self, path: &Path) -> Self {
        self.arg("-y").path(path)
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// True when any argument equals `needle`.
    #[must_use]
    pub fn has_arg(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a == needle)
    }

    /// Value following the first occurrence of `flag`, if any.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// Converts into a `std::process::Command` ready to spawn.
    #[must_use]
    pub fn to_std(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(self.args.iter().map(OsStr::new));
        cmd
    }

    /// Renders the command as a single shell-quoted line for logs.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .map(|part| shell_quote(&part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn shell_quote(part: &str) -> String {
    let plain = !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+%@".contains(c));
    if plain {
        part.to_string()
    } else {
        format!("'{}'", part.replace('\'', r"'\''"))
    }
}
