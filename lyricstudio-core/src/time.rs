//! Playback time helpers.
//!
//! Timestamps are plain `f64` seconds, the unit media elements report.
//! Anything that is not a finite, non-negative number reads as zero.

use std::time::Duration;

/// Clamp a playback time to a finite, non-negative number of seconds.
#[must_use]
pub fn sanitize_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Convert seconds into a `Duration`, saturating on overflow.
#[must_use]
pub fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(sanitize_seconds(seconds)).unwrap_or(Duration::MAX)
}

/// Format seconds as `MM:SS.ss`.
///
/// Minutes are zero-padded to two digits but not capped, so an hour renders
/// as `60:00.00`. Seconds are rounded from the exact stored value to two
/// decimals, so `4.005` (stored just below) renders as `00:04.00`. Exact
/// half-hundredths such as `0.125` round up.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = sanitize_seconds(seconds);
    let minutes = (seconds / 60.0).floor();
    let remainder = seconds - minutes * 60.0;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = minutes as u64;

    format!("{minutes:02}:{}", format_hundredths(remainder))
}

/// Render a non-negative remainder as `SS.ss`
fn format_hundredths(remainder: f64) -> String {
    let doubled = (remainder * 200.0).round();

    // `{:.2}` rounds exact ties to even; they go up instead
    #[allow(clippy::float_cmp)]
    let exact_tie = doubled % 2.0 == 1.0 && remainder.mul_add(200.0, -doubled) == 0.0;
    if exact_tie {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hundredths = (doubled as u64 + 1) / 2;
        return format!("{:02}.{:02}", hundredths / 100, hundredths % 100);
    }

    format!("{remainder:05.2}")
}

/// Format a lyric timestamp for an LRC `[MM:SS.ss]` tag.
#[must_use]
pub fn format_lrc_timestamp(seconds: f64) -> String {
    format_timestamp(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_minute_and_seconds() {
        assert_eq!(format_lrc_timestamp(65.0), "01:05.00");
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_lrc_timestamp(0.0), "00:00.00");
    }

    #[test]
    fn test_format_fractional_seconds() {
        assert_eq!(format_lrc_timestamp(125.5), "02:05.50");
        assert_eq!(format_timestamp(12.34), "00:12.34");
    }

    #[test]
    fn test_format_minutes_not_capped() {
        assert_eq!(format_timestamp(3600.0), "60:00.00");
        assert_eq!(format_timestamp(6000.25), "100:00.25");
    }

    #[test]
    fn test_format_rounds_half_hundredth_up() {
        assert_eq!(format_timestamp(0.125), "00:00.13");
        assert_eq!(format_timestamp(0.375), "00:00.38");
        assert_eq!(format_timestamp(60.625), "01:00.63");
    }

    #[test]
    fn test_format_rounds_stored_value_not_scaled_value() {
        // These decimals are stored slightly below the written value
        assert_eq!(format_timestamp(1.005), "00:01.00");
        assert_eq!(format_timestamp(4.005), "00:04.00");
        assert_eq!(format_timestamp(22.455), "00:22.45");
        assert_eq!(format_lrc_timestamp(592.255), "09:52.25");
        assert_eq!(format_lrc_timestamp(200.595), "03:20.59");
    }

    #[test]
    fn test_format_pads_seconds() {
        assert_eq!(format_timestamp(5.5), "00:05.50");
        assert_eq!(format_timestamp(0.01), "00:00.01");
        assert_eq!(format_timestamp(9.999), "00:10.00");
    }

    #[test]
    fn test_format_rounding_can_reach_sixty_seconds() {
        // Rounding the seconds never carries into the minutes
        assert_eq!(format_timestamp(59.999), "00:60.00");
    }

    #[test]
    fn test_format_clamps_invalid_input() {
        assert_eq!(format_timestamp(-3.0), "00:00.00");
        assert_eq!(format_timestamp(f64::NAN), "00:00.00");
        assert_eq!(format_timestamp(f64::INFINITY), "00:00.00");
    }

    #[test]
    fn test_sanitize_seconds() {
        assert!((sanitize_seconds(4.5) - 4.5).abs() < f64::EPSILON);
        assert!(sanitize_seconds(-1.0).abs() < f64::EPSILON);
        assert!(sanitize_seconds(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seconds_to_duration() {
        assert_eq!(seconds_to_duration(1.5), Duration::from_millis(1500));
        assert_eq!(seconds_to_duration(-2.0), Duration::ZERO);
    }
}
