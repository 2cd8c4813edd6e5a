// ============================================================================
// vidtoolz-core/src/operations/overlay.rs
// ============================================================================
//
// OVERLAY: Composite one video on top of another
//
// The filter graph, with optional stages in brackets:
//
//   [1:v] [trim,setpts] [scale=W:H] [format=yuva420p,fade=out:alpha=1] [ovr]
//   [ovr][0:v] scale2ref (normalized scale only)                       [ovr2][bg]
//   [bg][ovr2] overlay=X:Y:eof_action=pass                             [vout]
//   [1:a] [atrim,asetpts,afade]                                         [oa]
//   [0:a][oa] amix=inputs=2:duration=first                             [aout]
//
// Offsets are not clamped: an overlay pushed past the frame edge is clipped
// by ffmpeg when drawn.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::{Outcome, Toolkit, ensure_exists, resolve_output};
use crate::command::{Tool, ToolCommand};
use crate::config::Operation;
use crate::error::{CoreError, CoreResult};
use crate::filters::{FilterChain, FilterGraph};
use crate::time::{convert_to_seconds, format_seconds};

/// Default fade-out length at the end of a trimmed overlay (seconds).
pub const DEFAULT_FADE_SECS: f64 = 0.5;

/// Named anchor of the overlay inside the background frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    RightCenter,
    BottomRight,
    BottomCenter,
    BottomLeft,
    LeftCenter,
    Center,
}

impl Position {
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::RightCenter,
        Position::BottomRight,
        Position::BottomCenter,
        Position::BottomLeft,
        Position::LeftCenter,
        Position::Center,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Position::TopLeft => "TopLeft",
            Position::TopCenter => "TopCenter",
            Position::TopRight => "TopRight",
            Position::RightCenter => "RightCenter",
            Position::BottomRight => "BottomRight",
            Position::BottomCenter => "BottomCenter",
            Position::BottomLeft => "BottomLeft",
            Position::LeftCenter => "LeftCenter",
            Position::Center => "Center",
        }
    }

    /// The `(x, y)` overlay expressions for this anchor shifted by `(dx, dy)`.
    ///
    /// `W`/`H` are the background dimensions, `w`/`h` the overlay's.
    #[must_use]
    pub fn expressions(self, dx: i32, dy: i32) -> (String, String) {
        match self {
            Position::TopLeft => (format!("{dx}"), format!("{dy}")),
            Position::TopCenter => (format!("(W-w)/2+{dx}"), format!("{dy}")),
            Position::TopRight => (format!("(W-w)+{dx}"), format!("{dy}")),
            Position::RightCenter => (format!("(W-w)+{dx}"), format!("(H-h)/2+{dy}")),
            Position::BottomRight => (format!("(W-w)+{dx}"), format!("(H-h)+{dy}")),
            Position::BottomCenter => (format!("(W-w)/2+{dx}"), format!("(H-h)+{dy}")),
            Position::BottomLeft => (format!("{dx}"), format!("(H-h)+{dy}")),
            Position::LeftCenter => (format!("{dx}"), format!("(H-h)/2+{dy}")),
            Position::Center => (format!("(W-w)/2+{dx}"), format!("(H-h)/2+{dy}")),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Position {
    type Err = CoreError;

    /// Accepts the anchor names case-insensitively, with or without `-`/`_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        Position::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CoreError::InvalidInput(format!("Unknown overlay position '{s}'")))
    }
}

/// Size of the overlay clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayScale {
    /// Absolute pixels.
    Pixels { width: i32, height: i32 },
    /// Fractions of the background width and height.
    Normalized { width: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    pub position: Position,
    pub dx: i32,
    pub dy: i32,
    /// `None` keeps the overlay's native size.
    pub scale: Option<OverlayScale>,
    /// Trim the overlay to this many seconds.
    pub duration: Option<f64>,
    /// Fade-out at the end of the trimmed overlay; ignored without `duration`.
    pub fade: f64,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            position: Position::default(),
            dx: 0,
            dy: 0,
            scale: None,
            duration: None,
            fade: DEFAULT_FADE_SECS,
        }
    }
}

impl OverlayOptions {
    fn validate(&self) -> CoreResult<()> {
        if let Some(duration) = self.duration {
            if convert_to_seconds(duration)? == 0.0 {
                return Err(CoreError::InvalidInput(
                    "Overlay duration must be greater than 0.".to_string(),
                ));
            }
        }
        convert_to_seconds(self.fade)?;
        match self.scale {
            Some(OverlayScale::Pixels { width, height }) if width == 0 || height == 0 => {
                Err(CoreError::InvalidInput(
                    "Overlay scale dimensions cannot be 0.".to_string(),
                ))
            }
            Some(OverlayScale::Normalized { width, height })
                if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) =>
            {
                Err(CoreError::InvalidInput(
                    "Normalized scale ratios must be positive.".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// `(start, length)` of the fade-out, when one applies.
    fn fade_window(&self) -> Option<(f64, f64)> {
        let duration = self.duration?;
        if self.fade <= 0.0 {
            return None;
        }
        let length = self.fade.min(duration);
        Some((duration - length, length))
    }
}

/// Builds the `-filter_complex` graph for the given options.
#[must_use]
pub fn build_overlay_filter(options: &OverlayOptions) -> String {
    let fade = options.fade_window();

    let mut video = FilterChain::new();
    if let Some(duration) = options.duration {
        video = video
            .add(format!("trim=duration={}", format_seconds(duration)))
            .add("setpts=PTS-STARTPTS");
    }
    if let Some(OverlayScale::Pixels { width, height }) = options.scale {
        video = video.add(format!("scale={width}:{height}"));
    }
    if let Some((start, length)) = fade {
        video = video.add("format=yuva420p").add(format!(
            "fade=t=out:st={}:d={}:alpha=1",
            format_seconds(start),
            format_seconds(length)
        ));
    }

    let mut graph = FilterGraph::new().chain(&["1:v"], video, &["ovr"]);

    let (x, y) = options.position.expressions(options.dx, options.dy);
    let overlay = format!("overlay={x}:{y}:eof_action=pass");
    graph = match options.scale {
        Some(OverlayScale::Normalized { width, height }) => graph
            .node(
                &["ovr", "0:v"],
                format!(
                    "scale2ref=w=trunc(main_w*{width}/2)*2:h=trunc(main_h*{height}/2)*2"
                ),
                &["ovr2", "bg"],
            )
            .node(&["bg", "ovr2"], overlay, &["vout"]),
        _ => graph.node(&["0:v", "ovr"], overlay, &["vout"]),
    };

    let mix = "amix=inputs=2:duration=first";
    match options.duration {
        Some(duration) => {
            let audio = FilterChain::new()
                .add(format!("atrim=duration={}", format_seconds(duration)))
                .add("asetpts=PTS-STARTPTS")
                .add_if(fade.is_some(), || {
                    let (start, length) = fade.unwrap_or_default();
                    format!(
                        "afade=t=out:st={}:d={}",
                        format_seconds(start),
                        format_seconds(length)
                    )
                });
            graph
                .chain(&["1:a"], audio, &["oa"])
                .node(&["0:a", "oa"], mix, &["aout"])
        }
        None => graph.node(&["0:a", "1:a"], mix, &["aout"]),
    }
    .build()
}

/// `ffmpeg -i BG -i OVERLAY -filter_complex GRAPH -map [vout] -map [aout] -y OUT`
pub fn build_overlay_command(
    base: ToolCommand,
    background: &Path,
    overlay: &Path,
    output: &Path,
    options: &OverlayOptions,
) -> CoreResult<ToolCommand> {
    options.validate()?;
    Ok(base
        .input(background)
        .input(overlay)
        .option("-filter_complex", build_overlay_filter(options))
        .option("-map", "[vout]")
        .option("-map", "[aout]")
        .overwrite_output(output))
}

pub fn overlay_video(
    toolkit: &Toolkit<'_>,
    background: &Path,
    overlay: &Path,
    output: Option<&Path>,
    options: &OverlayOptions,
) -> CoreResult<Outcome> {
    ensure_exists(background)?;
    ensure_exists(overlay)?;
    let output = resolve_output(background, output, "overlay");
    let cmd = build_overlay_command(
        toolkit.command(Tool::Ffmpeg),
        background,
        overlay,
        &output,
        options,
    )?;
    toolkit.execute(&cmd, Operation::Overlay, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_anchor_expressions() {
        let cases = [
            (Position::TopLeft, ("5", "7")),
            (Position::TopCenter, ("(W-w)/2+5", "7")),
            (Position::TopRight, ("(W-w)+5", "7")),
            (Position::RightCenter, ("(W-w)+5", "(H-h)/2+7")),
            (Position::BottomRight, ("(W-w)+5", "(H-h)+7")),
            (Position::BottomCenter, ("(W-w)/2+5", "(H-h)+7")),
            (Position::BottomLeft, ("5", "(H-h)+7")),
            (Position::LeftCenter, ("5", "(H-h)/2+7")),
            (Position::Center, ("(W-w)/2+5", "(H-h)/2+7")),
        ];
        for (position, (x, y)) in cases {
            assert_eq!(position.expressions(5, 7), (x.to_string(), y.to_string()));
        }
    }

    #[test]
    fn test_anchor_expressions_are_distinct() {
        let pairs: HashSet<_> = Position::ALL.iter().map(|p| p.expressions(0, 0)).collect();
        assert_eq!(pairs.len(), 9);
    }

    #[test]
    fn test_negative_offsets_pass_through() {
        assert_eq!(
            Position::BottomRight.expressions(-10, -20),
            ("(W-w)+-10".to_string(), "(H-h)+-20".to_string())
        );
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!("TopLeft".parse::<Position>().unwrap(), Position::TopLeft);
        assert_eq!("bottom-right".parse::<Position>().unwrap(), Position::BottomRight);
        assert_eq!("left_center".parse::<Position>().unwrap(), Position::LeftCenter);
        assert!("middle".parse::<Position>().is_err());
        for p in Position::ALL {
            assert_eq!(p.to_string().parse::<Position>().unwrap(), p);
        }
    }

    #[test]
    fn test_plain_overlay_graph() {
        assert_eq!(
            build_overlay_filter(&OverlayOptions::default()),
            "[1:v]null[ovr];[0:v][ovr]overlay=0:0:eof_action=pass[vout];\
             [0:a][1:a]amix=inputs=2:duration=first[aout]"
        );
    }

    #[test]
    fn test_pixel_scale_graph() {
        let options = OverlayOptions {
            position: Position::Center,
            scale: Some(OverlayScale::Pixels { width: 320, height: 240 }),
            ..Default::default()
        };
        let graph = build_overlay_filter(&options);
        assert!(graph.starts_with("[1:v]scale=320:240[ovr];"));
        assert!(graph.contains("[0:v][ovr]overlay=(W-w)/2+0:(H-h)/2+0:eof_action=pass[vout]"));
    }

    #[test]
    fn test_normalized_scale_uses_background_as_reference() {
        let options = OverlayOptions {
            scale: Some(OverlayScale::Normalized { width: 0.25, height: 0.5 }),
            ..Default::default()
        };
        let graph = build_overlay_filter(&options);
        assert!(graph.contains(
            "[ovr][0:v]scale2ref=w=trunc(main_w*0.25/2)*2:h=trunc(main_h*0.5/2)*2[ovr2][bg]"
        ));
        assert!(graph.contains("[bg][ovr2]overlay=0:0:eof_action=pass[vout]"));
    }

    #[test]
    fn test_duration_trims_and_fades_both_streams() {
        let options = OverlayOptions {
            duration: Some(3.0),
            fade: 1.0,
            ..Default::default()
        };
        let graph = build_overlay_filter(&options);
        assert!(graph.starts_with(
            "[1:v]trim=duration=3,setpts=PTS-STARTPTS,format=yuva420p,fade=t=out:st=2:d=1:alpha=1[ovr]"
        ));
        assert!(graph.contains(
            "[1:a]atrim=duration=3,asetpts=PTS-STARTPTS,afade=t=out:st=2:d=1[oa]"
        ));
        assert!(graph.ends_with("[0:a][oa]amix=inputs=2:duration=first[aout]"));
    }

    #[test]
    fn test_fade_longer_than_duration_is_capped() {
        let options = OverlayOptions {
            duration: Some(0.4),
            fade: 2.0,
            ..Default::default()
        };
        assert!(build_overlay_filter(&options).contains("fade=t=out:st=0:d=0.4:alpha=1"));
    }

    #[test]
    fn test_fade_without_duration_is_ignored() {
        let graph = build_overlay_filter(&OverlayOptions {
            fade: 2.0,
            ..Default::default()
        });
        assert!(!graph.contains("fade"));
    }

    #[test]
    fn test_command_maps_labelled_outputs() {
        let cmd = build_overlay_command(
            ToolCommand::new("ffmpeg"),
            Path::new("bg.mp4"),
            Path::new("fg.mp4"),
            Path::new("out.mp4"),
            &OverlayOptions::default(),
        )
        .unwrap();
        let args = cmd.get_args();
        assert_eq!(&args[..4], ["-i", "bg.mp4", "-i", "fg.mp4"]);
        assert_eq!(&args[args.len() - 6..], ["-map", "[vout]", "-map", "[aout]", "-y", "out.mp4"]);
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let options = OverlayOptions {
            scale: Some(OverlayScale::Normalized { width: 0.0, height: 0.5 }),
            ..Default::default()
        };
        let result = build_overlay_command(
            ToolCommand::new("ffmpeg"),
            Path::new("bg.mp4"),
            Path::new("fg.mp4"),
            Path::new("out.mp4"),
            &options,
        );
        assert!(result.is_err());
    }
}
