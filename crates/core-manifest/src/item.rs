//! Item Record data structures
//!
//! An [`ItemRecord`] is the validated, strongly-typed form of one livery
//! metadata file. Field names are the wire contract with the client
//! application and are serialized exactly as contributors write them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// One downloadable livery package
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    /// Unique identifier across the whole catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Package version (semantic or free-form)
    pub version: String,

    /// Fallback download location when `downloads` is absent
    pub download_url: String,

    /// Aircraft type (e.g. "A320neo")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Scalar>,

    /// Aircraft variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Scalar>,

    /// Registration mark painted on the livery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<Scalar>,

    /// Year the livery was flown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Scalar>,

    /// Release notes, either free text or per-release entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Changelog>,

    /// Short badges shown next to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Screenshot URLs; the first one is the thumbnail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,

    /// Labelled download buttons, superseding `download_url` when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<Vec<DownloadLink>>,

    /// Fields outside the documented set, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A labelled download link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadLink {
    /// Button label (e.g. "MSFS 2024")
    pub label: String,

    /// Download location
    pub url: String,

    /// Extra keys on the entry, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A free-form scalar metadata value
///
/// Stored exactly as the contributor wrote it, so `"year": 1998` stays a
/// number and `"year": "1998"` stays a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Scalar {
    /// Convert a JSON value into a scalar, if it is one
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Scalar::Text(s.clone())),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Number(n.into())
    }
}

/// Release notes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Changelog {
    /// Per-release entries, newest first
    Entries(Vec<ChangelogEntry>),
    /// A single free-form note
    Note(Scalar),
}

/// Notes for one released version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangelogEntry {
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<String>>,

    /// Extra keys on the entry, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemRecord {
    /// Create a record with only the required fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            download_url: download_url.into(),
            aircraft: None,
            variant: None,
            registration: None,
            year: None,
            changelog: None,
            tags: None,
            photos: None,
            downloads: None,
            extra: Map::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    /// Add a photo URL
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photos.get_or_insert_with(Vec::new).push(url.into());
        self
    }

    /// Add a labelled download
    pub fn with_download(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.downloads
            .get_or_insert_with(Vec::new)
            .push(DownloadLink::new(label, url));
        self
    }

    /// The designated thumbnail: the first photo, if any
    pub fn thumbnail(&self) -> Option<&str> {
        self.photos
            .as_deref()
            .and_then(|photos| photos.first())
            .map(String::as_str)
    }

    /// Number of download options a client can offer for this item
    pub fn download_count(&self) -> usize {
        match self.downloads.as_deref() {
            Some(links) if !links.is_empty() => links.len(),
            _ => 1,
        }
    }
}

impl DownloadLink {
    /// Create a link with no extra keys
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            extra: Map::new(),
        }
    }
}
