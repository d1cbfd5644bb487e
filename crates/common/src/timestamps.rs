//! Timestamp rendering
//!
//! Readings store `created_at` as a zoneless UTC timestamp. Every response
//! renders it, and the current time, as ISO-8601 with milliseconds and `Z`.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stored timestamps are written in UTC without a zone
pub fn iso_stored_timestamp(at: NaiveDateTime) -> String {
    iso_timestamp(at.and_utc())
}

/// Serde adapter for stored timestamps.
///
/// Serializes through [`iso_stored_timestamp`]; deserializes either that form
/// or a zoneless timestamp.
pub mod stored {
    use super::iso_stored_timestamp;
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(at: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&iso_stored_timestamp(*at))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.naive_utc())
            .or_else(|_| raw.parse::<NaiveDateTime>())
            .map_err(D::Error::custom)
    }
}
