//! Decode-time coercions for the non-ISO field formats the API uses.
//!
//! Each `deserialize_*` function is wired to a record field with
//! `#[serde(deserialize_with = "...")]`, so raw strings are converted before
//! the record exists and a record never holds an unconverted value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use tracing::trace;

/// Format of calendar dates, e.g. `01/15/2024`.
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";
/// Format of clock times, e.g. `10:30AM`.
pub const US_TIME_FORMAT: &str = "%I:%M%p";
/// Timestamp with a compact UTC offset, e.g. `2024-03-20T10:34:52-0400`.
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parses an `MM/DD/YYYY` date.
pub fn parse_us_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), US_DATE_FORMAT)
}

/// Parses an `HH:MMam` clock time. Anything that is not a clock time, such as
/// `TBA`, yields `None`.
pub fn parse_us_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), US_TIME_FORMAT).ok()
}

/// Parses an ISO 8601 timestamp, with or without a colon in the offset.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, COMPACT_OFFSET_FORMAT))
}

pub fn deserialize_us_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_us_date(&raw).map_err(|e| de::Error::custom(format!("invalid date `{raw}`: {e}")))
}

/// A missing or `null` time is absent. A string that is not a clock time is
/// also absent: the API sends placeholders like `TBA` for unscheduled
/// meetings.
pub fn deserialize_us_time<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => {
            let parsed = parse_us_time(&raw);
            if parsed.is_none() {
                trace!(value = %raw, "Treating unparsable meeting time as absent");
            }
            Ok(parsed)
        }
    }
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
}

/// Requires the key to be present while allowing `null`.
///
/// A bare `Option` field would also accept a missing key; the API always
/// sends these keys, so a missing one means the record is malformed.
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::deserialize(deserializer)
}

/// Accepts an integer given either as a JSON number or as a numeric string.
pub fn deserialize_lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientIntVisitor;

    impl<'de> Visitor<'de> for LenientIntVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim()
                .parse::<i64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LenientIntVisitor)
}
