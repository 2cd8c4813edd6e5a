//! Core library for driving ffmpeg, ffprobe and ffplay from the vidtoolz CLI.
//!
//! This crate normalizes time arguments, builds argument-vector command lines
//! for each media operation and runs them through a [`ProcessRunner`] with a
//! per-operation timeout.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vidtoolz_core::{SystemRunner, Toolkit, ToolkitConfig};
//! use vidtoolz_core::operations::clip::{ClipOptions, clip_video};
//!
//! let config = ToolkitConfig::from_env();
//! let runner = SystemRunner;
//! let toolkit = Toolkit::new(&runner, &config);
//!
//! let options = ClipOptions {
//!     start: Some(vidtoolz_core::convert_to_seconds("00:01").unwrap()),
//!     duration: Some(2.0),
//!     ..Default::default()
//! };
//! let outcome = clip_video(&toolkit, Path::new("input.mp4"), None, &options).unwrap();
//! if outcome.success() {
//!     println!("Saved to {}", outcome.output_path.display());
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod filters;
pub mod mocks;
pub mod operations;
pub mod process;
pub mod time;

// Re-exports for public API
pub use command::{Tool, ToolCommand};
pub use config::{Operation, ToolkitConfig};
pub use error::{CoreError, CoreResult};
pub use operations::{Outcome, Toolkit, default_output_path};
pub use operations::overlay::{OverlayOptions, OverlayScale, Position};
pub use operations::reverse::ReverseEngine;
pub use operations::speed::AudioMode;
pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use time::{Timestamp, convert_to_seconds};
