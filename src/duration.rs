//! ISO-8601 duration parsing and human-readable formatting

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AnalyzerError, Result};

const SECONDS_PER_WEEK: f64 = 604_800.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+(?:\.\d+)?)W)?(?:(\d+(?:\.\d+)?)D)?(T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .expect("duration pattern is valid")
    })
}

/// Parse an ISO-8601 duration such as `PT1H2M3S` or `P1DT5M` into seconds.
///
/// Only fixed-length designators are accepted (weeks, days, hours, minutes,
/// seconds). Year and month components have no fixed length and are rejected.
pub fn parse_duration(text: &str) -> Result<f64> {
    let malformed = || AnalyzerError::MalformedDuration(text.to_string());

    let caps = duration_regex().captures(text.trim()).ok_or_else(malformed)?;

    let component = |index: usize| -> Result<Option<f64>> {
        caps.get(index)
            .map(|m| match m.as_str().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(malformed()),
            })
            .transpose()
    };

    let weeks = component(1)?;
    let days = component(2)?;
    let hours = component(4)?;
    let minutes = component(5)?;
    let seconds = component(6)?;

    let has_time_designator = caps.get(3).is_some();
    let has_time_part = hours.is_some() || minutes.is_some() || seconds.is_some();

    // "PT" with nothing after it, or a bare "P"
    if has_time_designator && !has_time_part {
        return Err(malformed());
    }
    if weeks.is_none() && days.is_none() && !has_time_part {
        return Err(malformed());
    }

    let total = weeks.unwrap_or(0.0) * SECONDS_PER_WEEK
        + days.unwrap_or(0.0) * SECONDS_PER_DAY
        + hours.unwrap_or(0.0) * SECONDS_PER_HOUR
        + minutes.unwrap_or(0.0) * SECONDS_PER_MINUTE
        + seconds.unwrap_or(0.0);

    if !total.is_finite() {
        return Err(malformed());
    }

    Ok(total)
}

/// Render seconds as `1h 2m 3s`, `2m 3s` or `3s`, truncating each component.
pub fn format_duration(seconds: f64) -> String {
    debug_assert!(seconds >= 0.0, "format_duration called with negative seconds");
    let total = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };

    let hours = (total / SECONDS_PER_HOUR).trunc();
    let remainder = total - hours * SECONDS_PER_HOUR;
    let minutes = (remainder / SECONDS_PER_MINUTE).trunc();
    let secs = (remainder - minutes * SECONDS_PER_MINUTE).trunc();

    let (hours, minutes, secs) = (hours as u64, minutes as u64, secs as u64);

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
