//! Domain DTOs for the diary API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift between the two crates. Field names on
//! the wire are camelCase. `date` and `diaryStatus` go through the adapters in
//! `codec` instead of the serde defaults.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::SyncError;

/// Who may read a diary entry. Encoded on the wire as its symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityStatus {
    Public,
    Private,
    Followers,
}

impl VisibilityStatus {
    pub const ALL: [VisibilityStatus; 3] = [
        VisibilityStatus::Public,
        VisibilityStatus::Private,
        VisibilityStatus::Followers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisibilityStatus::Public => "PUBLIC",
            VisibilityStatus::Private => "PRIVATE",
            VisibilityStatus::Followers => "FOLLOWERS",
        }
    }
}

impl fmt::Display for VisibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisibilityStatus {
    type Err = SyncError;

    /// Exact, case-sensitive match on the symbolic name. Never defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SyncError::Decode(format!("unknown diary status `{s}`")))
    }
}

/// Opaque reference to a locally stored image (a content URI, a file path).
///
/// Only the `ContentResolver` knows how to interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload for creating a diary. Built by the caller and submitted as the
/// JSON part of the multipart create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryRequest {
    pub title: String,
    pub content: String,
    #[serde(with = "codec::iso_date")]
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub diary_status: VisibilityStatus,
}

/// A diary as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryRecord {
    pub diary_id: i64,
    pub user_id: i64,
    #[serde(alias = "diaryTitle")]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(with = "codec::iso_date")]
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    pub diary_status: VisibilityStatus,
    #[serde(default)]
    pub is_liked: bool,
    /// Base64 profile image of the author, when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Server-side names of the attached images, in attachment order.
    #[serde(default)]
    pub images: Vec<String>,
}

/// One zero-indexed slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub last: bool,
}

/// Acknowledgement returned by delete and like/unlike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub diary_id: Option<i64>,
}
