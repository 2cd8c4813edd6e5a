//! `ffoverlay`: composite one video over another.

use std::path::PathBuf;

use clap::Args;
use vidtoolz_core::operations::overlay::{DEFAULT_FADE_SECS, overlay_video};
use vidtoolz_core::{OverlayOptions, OverlayScale, Position};

use super::{FFMPEG, Messages, report};
use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::Subcommands;

const MESSAGES: Messages = Messages {
    done: "Video FFmpeg overlay created",
    failed: "Error creating FFmpeg overlay",
    tool: FFMPEG,
};

fn position_names() -> String {
    Position::ALL
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Args, Debug, Clone)]
pub struct OverlayArgs {
    /// Path to the background video file
    pub background: PathBuf,

    /// Path to the overlay video file
    pub overlay: PathBuf,

    /// Path to the output video file (optional)
    pub output: Option<PathBuf>,

    /// Anchor of the overlay on the background
    #[arg(short, long, default_value_t = Position::TopLeft, long_help = format!("Anchor of the overlay on the background: {}", position_names()))]
    pub position: Position,

    /// Horizontal offset in pixels
    #[arg(short = 'x', long, default_value_t = 0, allow_negative_numbers = true)]
    pub dx: i32,

    /// Vertical offset in pixels
    #[arg(short = 'y', long, default_value_t = 0, allow_negative_numbers = true)]
    pub dy: i32,

    /// Overlay size in pixels
    #[arg(
        short = 's',
        long,
        num_args = 2,
        value_names = ["W", "H"],
        allow_negative_numbers = true,
        conflicts_with = "normalized_scale"
    )]
    pub overlay_scale: Option<Vec<i32>>,

    /// Overlay size as fractions of the background size
    #[arg(short = 'n', long, num_args = 2, value_names = ["WR", "HR"])]
    pub normalized_scale: Option<Vec<f64>>,

    /// Duration of the overlay in seconds
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Fade-out duration in seconds at the end of the overlay
    #[arg(short, long, default_value_t = DEFAULT_FADE_SECS)]
    pub fade_duration: f64,
}

impl OverlayArgs {
    #[must_use]
    pub fn options(&self) -> OverlayOptions {
        let scale = match (&self.overlay_scale, &self.normalized_scale) {
            (Some(px), _) if px.len() == 2 => Some(OverlayScale::Pixels {
                width: px[0],
                height: px[1],
            }),
            (_, Some(ratio)) if ratio.len() == 2 => Some(OverlayScale::Normalized {
                width: ratio[0],
                height: ratio[1],
            }),
            _ => None,
        };
        OverlayOptions {
            position: self.position,
            dx: self.dx,
            dy: self.dy,
            scale,
            duration: self.duration,
            fade: self.fade_duration,
        }
    }
}

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<OverlayArgs, _>(
        "ffoverlay",
        "Overlay one video on another using FFmpeg",
        handle,
    )
}

pub fn handle(args: OverlayArgs, ctx: &AppContext) -> CliResult<()> {
    let result = overlay_video(
        &ctx.toolkit(),
        &args.background,
        &args.overlay,
        args.output.as_deref(),
        &args.options(),
    );
    report(result, &MESSAGES)
}
