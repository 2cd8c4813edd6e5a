//! Configuration for the toolkit: per-operation timeouts, binary overrides
//! and engine tunables.
//!
//! All fields have defaults; [`ToolkitConfig::from_env`] applies the
//! `VIDTOOLZ_*` environment overrides on top of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::Tool;

/// Default timeout for clipping (seconds).
pub const DEFAULT_CLIP_TIMEOUT_SECS: u64 = 60;
/// Default timeout for scaling (seconds).
pub const DEFAULT_SCALE_TIMEOUT_SECS: u64 = 120;
/// Default timeout for overlay composition (seconds).
pub const DEFAULT_OVERLAY_TIMEOUT_SECS: u64 = 180;
/// Default timeout for concatenation (seconds).
pub const DEFAULT_CONCAT_TIMEOUT_SECS: u64 = 120;
/// Default timeout for speed changes (seconds).
pub const DEFAULT_SPEED_TIMEOUT_SECS: u64 = 300;
/// Default timeout for each reverse step (seconds).
pub const DEFAULT_REVERSE_TIMEOUT_SECS: u64 = 300;
/// Default timeout for ffprobe queries (seconds).
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;

/// Chunk length used by the segmented reverse engine (seconds).
pub const DEFAULT_REVERSE_CHUNK_SECS: f64 = 10.0;

/// Extension used for derived output names when the input has none.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "mp4";

/// Operations that carry their own timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Clip,
    Scale,
    Overlay,
    Concat,
    Speed,
    Reverse,
    Probe,
}

/// Runtime configuration shared by every command builder.
#[derive(Debug, Clone)]
pub struct ToolkitConfig {
    pub clip_timeout: Duration,
    pub scale_timeout: Duration,
    pub overlay_timeout: Duration,
    pub concat_timeout: Duration,
    pub speed_timeout: Duration,
    pub reverse_timeout: Duration,
    pub probe_timeout: Duration,

    /// Explicit encoder path; otherwise resolved through ffmpeg-sidecar
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit prober path
    pub ffprobe_path: Option<PathBuf>,
    /// Explicit player path
    pub ffplay_path: Option<PathBuf>,

    /// Chunk length for the segmented reverse engine
    pub reverse_chunk_secs: f64,

    /// Directory for temporary manifests and chunks (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            clip_timeout: Duration::from_secs(DEFAULT_CLIP_TIMEOUT_SECS),
            scale_timeout: Duration::from_secs(DEFAULT_SCALE_TIMEOUT_SECS),
            overlay_timeout: Duration::from_secs(DEFAULT_OVERLAY_TIMEOUT_SECS),
            concat_timeout: Duration::from_secs(DEFAULT_CONCAT_TIMEOUT_SECS),
            speed_timeout: Duration::from_secs(DEFAULT_SPEED_TIMEOUT_SECS),
            reverse_timeout: Duration::from_secs(DEFAULT_REVERSE_TIMEOUT_SECS),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            ffmpeg_path: None,
            ffprobe_path: None,
            ffplay_path: None,
            reverse_chunk_secs: DEFAULT_REVERSE_CHUNK_SECS,
            temp_dir: None,
        }
    }
}

impl ToolkitConfig {
    /// Defaults overlaid with `VIDTOOLZ_*` environment variables.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `VIDTOOLZ_TIMEOUT_CLIP` .. `VIDTOOLZ_TIMEOUT_PROBE` | timeout in seconds |
    /// | `VIDTOOLZ_FFMPEG`, `VIDTOOLZ_FFPROBE`, `VIDTOOLZ_FFPLAY` | binary path |
    /// | `VIDTOOLZ_REVERSE_CHUNK` | reverse chunk length in seconds |
    /// | `VIDTOOLZ_TEMP_DIR` | scratch directory |
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout = |key: &str, default: Duration| {
            Duration::from_secs(get_env_u64(key, default.as_secs()))
        };

        let config = Self {
            clip_timeout: timeout("VIDTOOLZ_TIMEOUT_CLIP", defaults.clip_timeout),
            scale_timeout: timeout("VIDTOOLZ_TIMEOUT_SCALE", defaults.scale_timeout),
            overlay_timeout: timeout("VIDTOOLZ_TIMEOUT_OVERLAY", defaults.overlay_timeout),
            concat_timeout: timeout("VIDTOOLZ_TIMEOUT_CONCAT", defaults.concat_timeout),
            speed_timeout: timeout("VIDTOOLZ_TIMEOUT_SPEED", defaults.speed_timeout),
            reverse_timeout: timeout("VIDTOOLZ_TIMEOUT_REVERSE", defaults.reverse_timeout),
            probe_timeout: timeout("VIDTOOLZ_TIMEOUT_PROBE", defaults.probe_timeout),
            ffmpeg_path: get_env_path("VIDTOOLZ_FFMPEG"),
            ffprobe_path: get_env_path("VIDTOOLZ_FFPROBE"),
            ffplay_path: get_env_path("VIDTOOLZ_FFPLAY"),
            reverse_chunk_secs: get_env_f64("VIDTOOLZ_REVERSE_CHUNK", defaults.reverse_chunk_secs),
            temp_dir: get_env_path("VIDTOOLZ_TEMP_DIR"),
        };
        log::debug!("Toolkit configuration: {:?}", config);
        config
    }

    /// Timeout applied to a single process invocation of `op`.
    #[must_use]
    pub fn timeout_for(&self, op: Operation) -> Duration {
        match op {
            Operation::Clip => self.clip_timeout,
            Operation::Scale => self.scale_timeout,
            Operation::Overlay => self.overlay_timeout,
            Operation::Concat => self.concat_timeout,
            Operation::Speed => self.speed_timeout,
            Operation::Reverse => self.reverse_timeout,
            Operation::Probe => self.probe_timeout,
        }
    }

    /// Explicit binary path configured for `tool`, if any.
    #[must_use]
    pub fn binary_override(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Ffmpeg => self.ffmpeg_path.as_deref(),
            Tool::Ffprobe => self.ffprobe_path.as_deref(),
            Tool::Ffplay => self.ffplay_path.as_deref(),
        }
    }

    /// Directory for scratch files.
    #[must_use]
    pub fn scratch_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Get a u64 value from an environment variable or use the default
pub fn get_env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring {}={:?}: not an unsigned integer", key, val);
            default
        }),
        Err(_) => default,
    }
}

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => match val.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => parsed,
            _ => {
                log::warn!("Ignoring {}={:?}: not a positive number", key, val);
                default
            }
        },
        Err(_) => default,
    }
}

/// Get an optional path from an environment variable (empty counts as unset)
pub fn get_env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Get a boolean value from an environment variable or use the default
pub fn get_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => val.eq_ignore_ascii_case("true") || val == "1",
        Err(_) => default,
    }
}
