//! The host-runtime boundary.
//!
//! A media player host drives the catalog exclusively through these two
//! traits. Addresses cross the boundary as opaque strings; the provider
//! owns their grammar. All browse-side operations are fail-soft: bad
//! addresses or remote failures yield empty results, never errors.

use crate::models::{CatalogRef, Image, StreamUrl, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Search request forwarded from the host. This backend does not support
/// search; the fields exist so the boundary signature is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub uris: Vec<String>,
    pub exact: bool,
}

/// Search outcome. Always empty for this backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub tracks: Vec<Track>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Errors surfaced to the host when resolving a catalog address for
/// playback. Fatal to the single playback attempt only.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("address is not a playable track: {uri}")]
    NotPlayable { uri: String },
    #[error("malformed stream token in {uri}: {reason}")]
    MalformedToken { uri: String, reason: String },
}

/// Browsable catalog surface. Methods take `&mut self`: the host is
/// expected to serialize calls into one logical actor, so the cache is
/// plain owned state without internal locking.
pub trait MediaLibrary {
    /// The fixed entry point of the catalog.
    fn root(&self) -> CatalogRef;

    /// List the entries under a catalog address. Unknown addresses and
    /// remote failures produce an empty listing.
    fn browse(&mut self, uri: &str) -> Vec<CatalogRef>;

    /// Resolve a track address to its cached metadata; zero or one
    /// records.
    fn lookup(&self, uri: &str) -> Vec<Track>;

    /// Artwork for every address that has a known image.
    fn get_images(&self, uris: &[String]) -> HashMap<String, Vec<Image>>;

    /// Explicit invalidation hook: an empty address flushes the whole
    /// cache, a specific address drops just that listing.
    fn refresh(&mut self, uri: &str);

    /// Always empty; search is unsupported.
    fn search(&mut self, query: &SearchQuery) -> SearchResult;
}

/// Converts a catalog track address into a directly fetchable stream
/// location. Bypasses the cache entirely.
pub trait PlaybackTranslator {
    fn translate_uri(&self, uri: &str) -> Result<StreamUrl, TranslateError>;
}
