use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Format the producer writes `date` in; matches an ISO-8601 local timestamp
/// with microsecond precision, e.g. `2024-01-15T10:30:00.123456`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One sales order as stored in the bucket
///
/// The JSON shape is exactly `{"order_id", "product", "price", "date"}`.
/// `date` stays a string until aggregation needs it as a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Order identifier; not unique across the bucket
    pub order_id: i64,
    /// Product name from the catalog
    pub product: String,
    /// Order price
    pub price: f64,
    /// ISO-8601 timestamp
    pub date: String,
}

impl Record {
    /// Parse `date` into a timestamp
    pub fn timestamp(&self) -> Result<NaiveDateTime, Error> {
        parse_timestamp(&self.date)
    }

    /// Decode a record from an object body
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Encode the record as an object body
    pub fn to_vec(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Parse a record timestamp.
///
/// Accepts `T`- or space-separated date-times with optional fractional
/// seconds, RFC 3339 with an offset (the wall-clock time is kept as written),
/// and a bare date, which maps to midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, Error> {
    let raw = raw.trim();

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::Timestamp(raw.to_string()))
}
