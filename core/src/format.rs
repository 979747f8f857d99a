//! Formatting helpers and serde adapters for the backend wire format.
//!
//! The backend accepts timestamps as ISO-8601 UTC with millisecond precision
//! (`2025-01-01T10:00:00.000Z`) and emits them either with an offset or as a
//! naive local timestamp, which is read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Format a timestamp the way the backend expects it in request bodies.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use ticketdesk_core::format::format_date_for_server;
///
/// let at = Utc.with_ymd_and_hms(2025, 3, 1, 18, 30, 0).unwrap();
/// assert_eq!(format_date_for_server(&at), "2025-03-01T18:30:00.000Z");
/// ```
#[must_use]
pub fn format_date_for_server(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `YYYY-MM-DD` rendering used in tables and filters.
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD HH:MM[:SS]` rendering.
#[must_use]
pub fn format_date_time(at: &DateTime<Utc>, include_seconds: bool) -> String {
    if include_seconds {
        at.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Amount with two decimals followed by the currency code, e.g. `1500.00 RUB`.
#[must_use]
pub fn format_currency(value: f64, currency_code: &str) -> String {
    format!("{value:.2} {currency_code}")
}

/// Parse a backend timestamp, accepting RFC 3339 or a naive UTC timestamp.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date, ignoring any time component after the date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Deserialize a count the backend may send as a number or a numeric string.
///
/// Unparseable strings count as zero.
///
/// # Errors
///
/// Returns a deserialization error if the value is neither a number nor a string.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Float(f64),
        Text(String),
    }

    Ok(match Count::deserialize(deserializer)? {
        Count::Number(n) => n,
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Count::Float(f) if f.is_finite() && f >= 0.0 => f as u64,
        Count::Float(_) => 0,
        Count::Text(s) => s.trim().parse().unwrap_or(0),
    })
}

/// `#[serde(with = "...")]` adapter for required timestamps.
pub mod timestamp {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, format_date_for_server, parse_timestamp};

    /// Serialize as ISO-8601 UTC with milliseconds.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date_for_server(at))
    }

    /// Deserialize from RFC 3339 or a naive UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a recognized timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// `#[serde(with = "...")]` adapter for optional timestamps.
///
/// Empty strings read as `None`.
pub mod option_timestamp {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, format_date_for_server, parse_timestamp};

    /// Serialize `Some` as ISO-8601 UTC with milliseconds, `None` as null.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(at: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match at {
            Some(at) => serializer.serialize_str(&format_date_for_server(at)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty string is not a recognized timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

/// `#[serde(with = "...")]` adapter for calendar dates (`YYYY-MM-DD`).
pub mod date {
    use super::{Deserialize, Deserializer, NaiveDate, Serializer, parse_date};

    /// Serialize as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    /// Deserialize from a date or a timestamp string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not start with a `YYYY-MM-DD` date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }
}

/// `#[serde(with = "...")]` adapter for optional calendar dates.
pub mod option_date {
    use super::{Deserialize, Deserializer, NaiveDate, Serializer, parse_date};

    /// Serialize `Some` as `YYYY-MM-DD`, `None` as null.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional date; empty strings read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-empty string does not start with a date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use proptest::prelude::*;

    #[test]
    fn test_server_format_has_millis_and_zulu() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 5).unwrap();
        assert_eq!(format_date_for_server(&at), "2024-12-31T23:59:05.000Z");
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let at = parse_timestamp("2025-05-20T19:00:00").unwrap();
        assert_eq!(at.hour(), 19);
        assert_eq!(at.day(), 20);
    }

    #[test]
    fn test_parse_offset_timestamp() {
        let at = parse_timestamp("2025-05-20T19:00:00+03:00").unwrap();
        assert_eq!(at.hour(), 16);
    }

    #[test]
    fn test_parse_date_ignores_time_part() {
        let date = parse_date("1990-04-12T00:00:00").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1990, 4, 12));
        assert!(parse_date("12.04.1990").is_none());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1500.0, "RUB"), "1500.00 RUB");
        assert_eq!(format_currency(9.999, "USD"), "10.00 USD");
    }

    #[test]
    fn test_format_date_time() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_date(&at), "2025-01-02");
        assert_eq!(format_date_time(&at, false), "2025-01-02 03:04");
        assert_eq!(format_date_time(&at, true), "2025-01-02 03:04:05");
    }

    proptest! {
        #[test]
        fn server_format_parses_back(secs in 0i64..4_102_444_800) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let formatted = format_date_for_server(&at);
            prop_assert!(formatted.ends_with(".000Z"));
            prop_assert_eq!(parse_timestamp(&formatted), Some(at));
        }
    }
}
