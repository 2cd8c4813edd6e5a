//! Time value normalization.
//!
//! Command-line time arguments arrive as bare seconds (`90`, `1.5`), `MM:SS`
//! or `HH:MM:SS`. Everything is normalized to float seconds before it reaches
//! a command builder.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// A time argument before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeInput<'a> {
    /// Already numeric, taken as seconds.
    Seconds(f64),
    /// Textual form: `S`, `M:S` or `H:M:S`, each part may be fractional.
    Text(&'a str),
}

impl From<f64> for TimeInput<'_> {
    fn from(value: f64) -> Self {
        TimeInput::Seconds(value)
    }
}

impl From<u32> for TimeInput<'_> {
    fn from(value: u32) -> Self {
        TimeInput::Seconds(f64::from(value))
    }
}

impl<'a> From<&'a str> for TimeInput<'a> {
    fn from(value: &'a str) -> Self {
        TimeInput::Text(value)
    }
}

/// Converts seconds, `MM:SS` or `HH:MM:SS` into float seconds.
///
/// Negative values, non-finite values and strings with more than three
/// `:`-separated parts are rejected.
///
/// # Examples
///
/// ```rust
/// use vidtoolz_core::time::convert_to_seconds;
///
/// assert_eq!(convert_to_seconds("01:02:03").unwrap(), 3723.0);
/// assert_eq!(convert_to_seconds("1:30").unwrap(), 90.0);
/// assert_eq!(convert_to_seconds(2.5).unwrap(), 2.5);
/// ```
pub fn convert_to_seconds<'a>(input: impl Into<TimeInput<'a>>) -> CoreResult<f64> {
    match input.into() {
        TimeInput::Seconds(value) => check_non_negative(value, &value.to_string()),
        TimeInput::Text(text) => parse_time_text(text),
    }
}

fn parse_time_text(text: &str) -> CoreResult<f64> {
    let invalid = |reason: &str| CoreError::InvalidTime {
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let parts = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| invalid("expected seconds, MM:SS or HH:MM:SS"))?;

    let seconds = match parts.as_slice() {
        [h, m, s] => h * 3600.0 + m * 60.0 + s,
        [m, s] => m * 60.0 + s,
        [s] => *s,
        _ => return Err(invalid("more than three ':'-separated parts")),
    };

    if parts.iter().any(|p| *p < 0.0) {
        return Err(invalid("time values cannot be negative"));
    }
    check_non_negative(seconds, text)
}

fn check_non_negative(value: f64, original: &str) -> CoreResult<f64> {
    if !value.is_finite() {
        return Err(CoreError::InvalidTime {
            value: original.to_string(),
            reason: "not a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(CoreError::InvalidTime {
            value: original.to_string(),
            reason: "time values cannot be negative".to_string(),
        });
    }
    Ok(value)
}

/// Normalized time argument, parseable straight from the command line.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Creates a timestamp from seconds, applying the same validation as
    /// [`convert_to_seconds`].
    pub fn from_seconds(seconds: f64) -> CoreResult<Self> {
        convert_to_seconds(seconds).map(Timestamp)
    }

    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        convert_to_seconds(s).map(Timestamp)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_seconds(self.0))
    }
}

/// Renders seconds the way they are passed to ffmpeg (`3`, `1.5`).
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_forms() {
        assert_eq!(convert_to_seconds("00:00:00").unwrap(), 0.0);
        assert_eq!(convert_to_seconds("01:02:03").unwrap(), 3723.0);
        assert_eq!(convert_to_seconds("2:00:00").unwrap(), 7200.0);
        assert_eq!(convert_to_seconds("01:30:45.75").unwrap(), 5445.75);
        // Parts are not range checked
        assert_eq!(convert_to_seconds("00:61:00").unwrap(), 3660.0);
    }

    #[test]
    fn test_ms_forms() {
        assert_eq!(convert_to_seconds("1:30").unwrap(), 90.0);
        assert_eq!(convert_to_seconds("00:05").unwrap(), 5.0);
        assert_eq!(convert_to_seconds("2:0.5").unwrap(), 120.5);
    }

    #[test]
    fn test_bare_numbers() {
        assert_eq!(convert_to_seconds("42").unwrap(), 42.0);
        assert_eq!(convert_to_seconds("1.25").unwrap(), 1.25);
        assert_eq!(convert_to_seconds(" 7 ").unwrap(), 7.0);
        assert_eq!(convert_to_seconds(3.5).unwrap(), 3.5);
        assert_eq!(convert_to_seconds(10u32).unwrap(), 10.0);
    }

    #[test]
    fn test_property_holds_for_grid() {
        for h in [0.0, 1.0, 12.0] {
            for m in [0.0, 7.0, 59.0] {
                for s in [0.0, 0.5, 30.25] {
                    let text = format!("{h}:{m}:{s}");
                    assert_eq!(
                        convert_to_seconds(text.as_str()).unwrap(),
                        h * 3600.0 + m * 60.0 + s
                    );
                    let text = format!("{m}:{s}");
                    assert_eq!(convert_to_seconds(text.as_str()).unwrap(), m * 60.0 + s);
                }
            }
        }
    }

    #[test]
    fn test_rejects_four_parts() {
        let err = convert_to_seconds("1:2:3:4").unwrap_err();
        assert!(matches!(err, CoreError::InvalidTime { .. }));
    }

    #[test]
    fn test_rejects_garbage_and_negatives() {
        assert!(convert_to_seconds("").is_err());
        assert!(convert_to_seconds("abc").is_err());
        assert!(convert_to_seconds("1:").is_err());
        assert!(convert_to_seconds("-5").is_err());
        assert!(convert_to_seconds("00:-1:00").is_err());
        assert!(convert_to_seconds(-0.5).is_err());
        assert!(convert_to_seconds(f64::NAN).is_err());
    }

    #[test]
    fn test_timestamp_from_str() {
        let ts: Timestamp = "00:00:02".parse().unwrap();
        assert_eq!(ts.as_secs_f64(), 2.0);
        assert_eq!(ts.to_string(), "2");
        assert!("x".parse::<Timestamp>().is_err());
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(3.0), "3");
        assert_eq!(format_seconds(1.5), "1.5");
        assert_eq!(format_seconds(0.0), "0");
    }
}
