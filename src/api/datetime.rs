//! Wire format for date fields.
//!
//! The service stores naive datetimes. Dates entered without a time are sent
//! with a fixed midnight component, e.g. `2024-05-01T00:00:00`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used for every datetime the client sends.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used for the date portion shown in forms.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a datetime as returned by the service. Accepts naive datetimes with
/// or without fractional seconds, RFC 3339 timestamps and bare dates. Offsets
/// are dropped, keeping the local wall-clock value.
///
pub fn parse(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
        .or_else(|| parse_date(value))
}

/// Parse a bare `YYYY-MM-DD` date as midnight of that day.
///
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// Serde adapters for `Option<NaiveDateTime>` fields.
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid datetime '{}'", raw))),
            None => Ok(None),
        }
    }
}
