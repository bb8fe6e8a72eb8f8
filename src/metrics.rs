//! Derived run metrics
//!
//! Pure conversions between raw distance/duration and the "M:SS" strings the
//! training plan uses for pace and duration.

/// Pace reported when distance or duration is missing
pub const ZERO_PACE: &str = "0:00";

/// ---------------------------------------------------------------------------
/// Pace
/// ---------------------------------------------------------------------------

/// Pace per kilometer as "M:SS", truncating both minutes and seconds.
pub fn pace(distance_m: f64, duration_s: f64) -> String {
  if distance_m <= 0.0 || duration_s <= 0.0 {
    return ZERO_PACE.to_string();
  }

  let secs_per_km = duration_s / (distance_m / 1000.0);
  let minutes = (secs_per_km / 60.0).floor() as u64;
  let seconds = (secs_per_km % 60.0).floor() as u64;
  format!("{}:{:02}", minutes, seconds)
}

/// Parse an "M:SS" pace into seconds per km.
///
/// Returns `None` for anything that isn't exactly two non-negative integer
/// parts.
pub fn parse_pace(pace: &str) -> Option<i64> {
  let (minutes, seconds) = pace.split_once(':')?;
  if seconds.contains(':') {
    return None;
  }

  let minutes: i64 = minutes.trim().parse().ok()?;
  let seconds: i64 = seconds.trim().parse().ok()?;
  if minutes < 0 || seconds < 0 {
    return None;
  }
  minutes.checked_mul(60)?.checked_add(seconds)
}

/// Lossy variant of [`parse_pace`]: malformed input yields 0.
///
/// Callers must read 0 as "unparseable", not as a real pace.
pub fn pace_to_seconds(pace: &str) -> i64 {
  parse_pace(pace).unwrap_or(0)
}

/// ---------------------------------------------------------------------------
/// Duration
/// ---------------------------------------------------------------------------

/// "H:MM:SS" when at least an hour, otherwise "M:SS"
pub fn format_duration(duration_s: u64) -> String {
  let hours = duration_s / 3600;
  let minutes = (duration_s % 3600) / 60;
  let seconds = duration_s % 60;

  if hours > 0 {
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
  } else {
    format!("{}:{:02}", minutes, seconds)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
