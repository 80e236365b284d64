//! Wire JSON codec.
//!
//! Two fields need rules the serde defaults don't give us: calendar dates are
//! written as `YYYY-MM-DD` strings and read back without any timezone
//! adjustment, and `VisibilityStatus` is written as its symbolic name and
//! read back strictly (an unknown name is an error, never a fallback).

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SyncError;
use crate::types::{DiaryRequest, VisibilityStatus};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// `#[serde(with = "codec::iso_date")]` adapter for `chrono::NaiveDate`.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map_err(|e| de::Error::custom(format!("invalid date `{raw}`: {e}")))
    }
}

impl Serialize for VisibilityStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VisibilityStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(|_| {
            de::Error::unknown_variant(&raw, &["PUBLIC", "PRIVATE", "FOLLOWERS"])
        })
    }
}

/// Serialize the JSON part of a create request.
pub fn encode_request(request: &DiaryRequest) -> Result<Vec<u8>, SyncError> {
    serde_json::to_vec(request).map_err(|e| SyncError::Unexpected(format!("encode failed: {e}")))
}

/// Decode a response body into `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SyncError> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}

/// True when a body carries no value: empty, whitespace, or JSON `null`.
pub fn is_absent(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed == "null"
}
