//! # Temporal Types — UTC Timestamps with Millisecond Precision
//!
//! Defines `Timestamp`, the UTC-only instant used for `validFrom`,
//! `validUntil`, and proof `created` values.
//!
//! ## Wire Format
//!
//! Timestamps render as `YYYY-MM-DDTHH:MM:SS.fffZ`: always UTC, always
//! three fractional digits, always the `Z` suffix. Sub-millisecond precision
//! is truncated at construction so that a parse/render cycle is stable.
//!
//! ## Parsing
//!
//! Parsing is lenient because credentials arrive from many issuers:
//! RFC 3339 with any offset (converted to UTC), naive date-times (assumed
//! UTC), and bare dates (midnight UTC) are all accepted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// A UTC timestamp truncated to millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `chrono::DateTime<Utc>`, truncating below milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_millis(dt))
    }

    /// Parse a timestamp string. See the module docs for accepted forms.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::Timestamp`] if no accepted form matches.
    pub fn parse(s: &str) -> Result<Self, EncodingError> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self::from_utc(naive.and_utc()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Ok(Self::from_utc(naive.and_utc()));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::from_utc(midnight.and_utc()));
            }
        }
        Err(EncodingError::Timestamp {
            input: s.to_string(),
            reason: "expected an RFC 3339 date-time or YYYY-MM-DD date".into(),
        })
    }

    /// From Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, EncodingError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| EncodingError::Timestamp {
                input: secs.to_string(),
                reason: "out of range for a Unix timestamp".into(),
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds, as used by JWT `exp`/`iat`/`nbf` claims.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS.fffZ`.
    pub fn to_rfc3339_millis(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339_millis())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339_millis())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let millis = dt.nanosecond() / 1_000_000 * 1_000_000;
    dt.with_nanosecond(millis).unwrap_or(dt)
}
