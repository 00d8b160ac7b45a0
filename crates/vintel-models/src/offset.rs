//! Video offset parsing and formatting.
//!
//! The REST API encodes offsets as protobuf-JSON duration strings: decimal
//! seconds with an `s` suffix and up to nine fractional digits, e.g. `"0s"`,
//! `"7s"`, `"12.345s"`.

use std::time::Duration;

use thiserror::Error;

/// Offset parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    #[error("Offset cannot be empty")]
    Empty,

    #[error("Offset '{0}' is missing the 's' suffix")]
    MissingSuffix(String),

    #[error("Invalid offset value: {0}")]
    InvalidValue(String),

    #[error("Offset cannot be negative: {0}")]
    Negative(String),
}

/// Parse a protobuf-JSON duration string into a [`Duration`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use vintel_models::offset::parse_offset;
/// assert_eq!(parse_offset("7s").unwrap(), Duration::from_secs(7));
/// assert_eq!(parse_offset("12.345s").unwrap(), Duration::from_millis(12345));
/// ```
pub fn parse_offset(value: &str) -> Result<Duration, OffsetError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(OffsetError::Empty);
    }

    let body = value
        .strip_suffix('s')
        .ok_or_else(|| OffsetError::MissingSuffix(value.to_string()))?;
    if body.is_empty() {
        return Err(OffsetError::InvalidValue(value.to_string()));
    }
    if body.starts_with('-') {
        return Err(OffsetError::Negative(value.to_string()));
    }

    let (secs_part, frac_part) = match body.split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (body, None),
    };

    let secs: u64 = secs_part
        .parse()
        .map_err(|_| OffsetError::InvalidValue(value.to_string()))?;

    let nanos = match frac_part {
        None => 0u32,
        Some(frac) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(OffsetError::InvalidValue(value.to_string()));
            }
            let digits: u32 = frac
                .parse()
                .map_err(|_| OffsetError::InvalidValue(value.to_string()))?;
            digits * 10u32.pow(9 - frac.len() as u32)
        }
    };

    Ok(Duration::new(secs, nanos))
}

/// Parse an optional offset field.
///
/// Proto3 omits zero-valued fields, so a missing offset means zero.
pub fn parse_optional_offset(value: Option<&str>) -> Result<Duration, OffsetError> {
    match value {
        None => Ok(Duration::ZERO),
        Some(s) if s.trim().is_empty() => Ok(Duration::ZERO),
        Some(s) => parse_offset(s),
    }
}

/// Format a duration as `HH:MM:SS` or `HH:MM:SS.mmm` for report rows.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use vintel_models::offset::format_offset;
/// assert_eq!(format_offset(Duration::from_secs(90)), "00:01:30");
/// assert_eq!(format_offset(Duration::from_millis(5400500)), "01:30:00.500");
/// ```
pub fn format_offset(offset: Duration) -> String {
    let total_secs = offset.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    let millis = offset.subsec_millis();

    if millis > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    }
}
