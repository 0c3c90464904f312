//! Display timezone offset parsing.

use super::error::ConfigError;
use crate::constants::MAX_UTC_OFFSET_SECS;

/// Parse a UTC offset such as `+08:00`, `-0530`, `+8`, `Z`, or `UTC` into seconds east of UTC.
pub fn parse_utc_offset(raw: &str) -> Result<i32, ConfigError> {
    let invalid = || ConfigError::InvalidUtcOffset {
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(0);
    }

    if !trimmed.is_ascii() {
        return Err(invalid());
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.len() > 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let seconds = sign * (hours * 3600 + minutes * 60);
    if seconds.abs() > MAX_UTC_OFFSET_SECS {
        return Err(invalid());
    }
    Ok(seconds)
}
