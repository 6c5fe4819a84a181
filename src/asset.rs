//! Core data model shared across the crate.
//!
//! An [`Asset`] is one generated image: its prompt, aspect ratio, creation
//! time, and the raster itself as a PNG data URI. Assets are created once by
//! the generation path; editing replaces `image_data` in place (same id, same
//! record identity). The history (see [`store`](crate::store)) exclusively
//! owns asset records — listings and the session selection hold ids only.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque unique asset identifier (UUIDv4 under the hood).
///
/// Stored and serialized as a plain string so history files stay readable
/// and ids from older tool versions keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Generate a fresh globally-unique id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters — used for share links and compact CLI display.
    /// Counts chars, not bytes: ids are arbitrary strings, not just UUIDs.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The five presentation shapes the generation collaborator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    /// Wire string as understood by the generation collaborator (`"W:H"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
        }
    }

    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Portrait3x4,
        Self::Landscape4x3,
        Self::Portrait9x16,
        Self::Landscape16x9,
    ];
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown aspect ratio '{0}' (expected one of 1:1, 3:4, 4:3, 9:16, 16:9)")]
pub struct ParseAspectRatioError(String);

impl FromStr for AspectRatio {
    type Err = ParseAspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseAspectRatioError(s.to_string()))
    }
}

/// One generated image record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// PNG raster encoded as a `data:image/png;base64,…` URI.
    pub image_data: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub aspect_ratio: AspectRatio,
}

/// Prefix of every data URI this tool produces.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

#[derive(Error, Debug)]
pub enum DataUriError {
    #[error("image data is not a base64 data URI")]
    NotADataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Encode raw PNG bytes as a data URI.
pub fn encode_png_data_uri(bytes: &[u8]) -> String {
    format!("{PNG_DATA_URI_PREFIX}{}", BASE64.encode(bytes))
}

/// Decode the payload of a `data:<mime>;base64,…` URI.
///
/// The mime type is not validated here — the raster decoder downstream is
/// the authority on whether the bytes are a usable image.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, DataUriError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_mime, payload)| payload)
        .ok_or(DataUriError::NotADataUri)?;
    Ok(BASE64.decode(payload)?)
}
