//! In-memory catalog cache with a wall-clock freshness policy.
//!
//! Three maps keyed by parsed catalog address: directory listings,
//! track records and artwork references. Listings can be invalidated
//! individually; track records and artwork only ever leave on a full
//! flush.

use crate::uri::CatalogUri;
use hearthis_core::models::{CatalogRef, Image, Track};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Decides when the whole cache must be flushed before serving a
/// browse. Separate from the storage so a different strategy (e.g. a
/// size-bounded one) can be swapped in without touching the browser.
pub trait ExpiryPolicy {
    fn should_flush(&self, age: Duration) -> bool;
}

/// Flush once the cache is older than a fixed maximum age.
#[derive(Debug, Clone)]
pub struct MaxAgePolicy {
    max_age: Duration,
}

impl MaxAgePolicy {
    pub fn new(max_age: Duration) -> Self {
        Self { max_age }
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes * 60))
    }
}

impl ExpiryPolicy for MaxAgePolicy {
    fn should_flush(&self, age: Duration) -> bool {
        age > self.max_age
    }
}

#[derive(Debug)]
pub struct CatalogCache {
    listings: HashMap<CatalogUri, Vec<CatalogRef>>,
    tracks: HashMap<CatalogUri, Track>,
    images: HashMap<CatalogUri, Image>,
    /// Freshness marker: instant of the last full flush.
    last_flush: Instant,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
            tracks: HashMap::new(),
            images: HashMap::new(),
            last_flush: Instant::now(),
        }
    }

    /// Pure lookup; no side effects.
    pub fn listing(&self, address: &CatalogUri) -> Option<&[CatalogRef]> {
        self.listings.get(address).map(Vec::as_slice)
    }

    pub fn put_listing(&mut self, address: CatalogUri, listing: Vec<CatalogRef>) {
        self.listings.insert(address, listing);
    }

    /// Drop a single listing. Lazy: leaves track records and artwork in
    /// place until the next full flush.
    pub fn invalidate(&mut self, address: &CatalogUri) {
        self.listings.remove(address);
    }

    /// Clear listings, track records and artwork. Does not touch the
    /// freshness marker; callers on the expiry path combine this with
    /// `mark_fresh`.
    pub fn flush_all(&mut self) {
        self.listings.clear();
        self.tracks.clear();
        self.images.clear();
    }

    pub fn track(&self, address: &CatalogUri) -> Option<&Track> {
        self.tracks.get(address)
    }

    pub fn put_track(&mut self, address: CatalogUri, track: Track) {
        self.tracks.insert(address, track);
    }

    pub fn image(&self, address: &CatalogUri) -> Option<&Image> {
        self.images.get(address)
    }

    pub fn put_image(&mut self, address: CatalogUri, image: Image) {
        self.images.insert(address, image);
    }

    /// Time since the last full flush.
    pub fn age(&self) -> Duration {
        self.last_flush.elapsed()
    }

    pub fn mark_fresh(&mut self) {
        self.last_flush = Instant::now();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            listing_count: self.listings.len(),
            track_count: self.tracks.len(),
            image_count: self.images.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub listing_count: usize,
    pub track_count: usize,
    pub image_count: usize,
}
