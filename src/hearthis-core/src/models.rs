use serde::{Deserialize, Serialize};

/// A single entry in a browsable catalog listing: either a directory the
/// host can descend into or a playable track leaf.
///
/// The `uri` is an opaque catalog address from the host's point of view;
/// only the provider crate parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogRef {
    Directory { uri: String, name: String },
    Track { uri: String, name: String },
}

impl CatalogRef {
    pub fn directory(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Directory {
            uri: uri.into(),
            name: name.into(),
        }
    }

    pub fn track(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Track {
            uri: uri.into(),
            name: name.into(),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::Directory { uri, .. } | Self::Track { uri, .. } => uri,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::Track { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }
}

/// A catalog node referenced from track metadata (owner acting as both
/// album and artist for services without an album concept).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedName {
    pub uri: String,
    pub name: String,
}

impl LinkedName {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }
}

/// Full track metadata as served to the host on `lookup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    /// Display name, prefixed with the zero-padded listing ordinal.
    pub name: String,
    pub album: LinkedName,
    pub artist: LinkedName,
    /// Date-only string, `YYYY-MM-DD`.
    pub date: String,
    pub length_ms: u64,
    /// 1-based position within the full unpaginated listing.
    pub track_no: u32,
}

/// An external artwork image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image(pub String);

impl Image {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }
}

impl AsRef<str> for Image {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stream URL returned by the playback translator. The host is
/// responsible for actually reading the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUrl(pub String);

impl StreamUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl AsRef<str> for StreamUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StreamUrl {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for StreamUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}
