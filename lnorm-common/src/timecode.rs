//! Timecode conversion helpers
//!
//! ffmpeg reports positions as `HH:MM:SS.ss`. These helpers convert between
//! that layout and plain seconds for progress math and display.

/// Convert hour/minute/second components to seconds
///
/// # Examples
///
/// ```
/// use lnorm_common::timecode::to_seconds;
///
/// assert_eq!(to_seconds(0, 1, 0.0), 60.0);
/// assert_eq!(to_seconds(1, 0, 30.5), 3630.5);
/// ```
pub fn to_seconds(hours: u32, minutes: u32, seconds: f64) -> f64 {
    f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds
}

/// Parse an `HH:MM:SS.ss` timecode into seconds
///
/// Returns `None` for anything that is not three colon-separated numeric fields.
///
/// ```
/// use lnorm_common::timecode::parse_timecode;
///
/// assert_eq!(parse_timecode("00:01:00.00"), Some(60.0));
/// assert_eq!(parse_timecode("N/A"), None);
/// ```
pub fn parse_timecode(text: &str) -> Option<f64> {
    let mut parts = text.trim().splitn(3, ':');
    let hours = parts.next()?.parse::<u32>().ok()?;
    let minutes = parts.next()?.parse::<u32>().ok()?;
    let seconds = parts.next()?.parse::<f64>().ok()?;

    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    Some(to_seconds(hours, minutes, seconds))
}

/// Format seconds as `M:SS` (under an hour) or `H:MM:SS`
///
/// Fractions are truncated. Negative and non-finite input formats as `0:00`.
///
/// ```
/// use lnorm_common::timecode::format_timecode;
///
/// assert_eq!(format_timecode(75.9), "1:15");
/// assert_eq!(format_timecode(3661.0), "1:01:01");
/// ```
pub fn format_timecode(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };

    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
