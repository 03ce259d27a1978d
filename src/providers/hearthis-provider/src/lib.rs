//! Catalog backend for hearthis.at.
//!
//! Exposes the account's social feed (followed users and their tracks)
//! as a browsable catalog behind the `hearthis-core` library traits.
//! Listings, track records and artwork are memoized per address; a
//! wall-clock policy flushes the whole cache once it ages out. Stream
//! locators ride inside track addresses as base64 tokens, so playback
//! resolution needs no lookup table.

mod mapping;

pub mod cache;
pub mod client;
pub mod models;
pub mod uri;

use cache::{CatalogCache, ExpiryPolicy, MaxAgePolicy};
use client::{ClientError, Credentials, HearthisClient, Session, PAGE_SIZE};
use hearthis_core::models::{CatalogRef, Image, StreamUrl, Track};
use hearthis_core::{
    HearthisConfig, MediaLibrary, PlaybackTranslator, SearchQuery, SearchResult, TranslateError,
};
use std::collections::HashMap;
use uri::{CatalogUri, StreamToken, TrackSource};

/// Display label of the personal-feed entry under the root. The leading
/// spaces sort it ahead of followed users in host UIs.
pub const FEED_LABEL: &str = "    Feed of ";

const ROOT_NAME: &str = "Hearthis";

/// The backend instance: one blocking client, at most one session, one
/// owned cache. The host serializes calls, so no internal locking.
pub struct HearthisBackend {
    client: HearthisClient,
    session: Option<Session>,
    cache: CatalogCache,
    policy: Box<dyn ExpiryPolicy + Send>,
}

impl HearthisBackend {
    /// Build the backend and perform the one-time login. A rejected or
    /// failed login is not fatal: the backend comes up degraded and
    /// every remote-dependent operation returns empty results.
    pub fn connect(
        config: &HearthisConfig,
        credentials: &Credentials,
    ) -> Result<Self, ClientError> {
        Self::with_policy(
            &config.api_url,
            credentials,
            Box::new(MaxAgePolicy::from_minutes(config.cache_minutes)),
        )
    }

    pub fn with_policy(
        api_url: &str,
        credentials: &Credentials,
        policy: Box<dyn ExpiryPolicy + Send>,
    ) -> Result<Self, ClientError> {
        let client = HearthisClient::new(api_url)?;
        let session = match client.login(credentials) {
            Ok(session) => {
                tracing::info!(username = %session.username, "logged in to hearthis");
                Some(session)
            }
            Err(err) => {
                tracing::error!("login failed, all listings will be empty: {err}");
                None
            }
        };
        Ok(Self {
            client,
            session,
            cache: CatalogCache::new(),
            policy,
        })
    }

    /// Whether the startup login succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn flush_if_stale(&mut self) {
        let age = self.cache.age();
        if self.policy.should_flush(age) {
            tracing::info!(
                age_minutes = age.as_secs() / 60,
                stats = ?self.cache.stats(),
                "cache aged out, flushing"
            );
            self.cache.flush_all();
            self.cache.mark_fresh();
        }
    }

    fn load_root(&mut self) -> Vec<CatalogRef> {
        let Some(session) = self.session.clone() else {
            tracing::warn!("not logged in, root listing unavailable");
            return Vec::new();
        };

        let mut refs = Vec::new();
        let feed_uri = CatalogUri::FeedPage(1);
        refs.push(CatalogRef::directory(
            feed_uri.to_string(),
            format!("{FEED_LABEL}{}", session.username),
        ));
        self.cache
            .put_image(feed_uri, Image::new(&session.avatar_url));

        match self.client.following(&session, 1) {
            Ok(followed) => {
                for user in followed {
                    let user_uri = CatalogUri::UserPage {
                        user: user.permalink,
                        page: 1,
                    };
                    self.cache
                        .put_image(user_uri.clone(), Image::new(user.avatar_url));
                    refs.push(CatalogRef::directory(user_uri.to_string(), user.username));
                }
                self.cache.put_listing(CatalogUri::Root, refs.clone());
            }
            // Serve the partial listing but leave it uncached so the
            // next browse retries the fetch.
            Err(err) => tracing::error!("failed to load followed users: {err}"),
        }
        refs
    }

    fn load_track_page(&mut self, source: TrackSource, page: u32) -> Vec<CatalogRef> {
        let Some(session) = self.session.clone() else {
            tracing::warn!("not logged in, track listing unavailable");
            return Vec::new();
        };

        tracing::info!(?source, page, "loading tracks from hearthis");
        let remote_tracks = match self.client.tracks(&session, &source, page) {
            Ok(tracks) => tracks,
            Err(err) => {
                tracing::error!("failed to load tracks: {err}");
                return Vec::new();
            }
        };

        let mut refs = Vec::new();
        let first_ordinal = (page - 1) * PAGE_SIZE + 1;
        for (offset, remote) in remote_tracks.iter().enumerate() {
            let ordinal = first_ordinal + offset as u32;
            let token = StreamToken::encode(&remote.stream_url);
            let address = source.track_uri(page, token);
            let track = match mapping::map_track(remote, ordinal, &address) {
                Ok(track) => track,
                Err(err) => {
                    tracing::warn!(title = %remote.title, "skipping track: {err}");
                    continue;
                }
            };
            if let Some(artwork) = &remote.artwork_url {
                self.cache.put_image(address.clone(), Image::new(artwork));
            }
            refs.push(CatalogRef::track(address.to_string(), track.name.clone()));
            self.cache.put_track(address, track);
        }

        let next_page = page + 1;
        refs.push(CatalogRef::directory(
            source.page_uri(next_page).to_string(),
            format!("Page {next_page}"),
        ));
        self.cache.put_listing(source.page_uri(page), refs.clone());
        refs
    }
}

impl MediaLibrary for HearthisBackend {
    fn root(&self) -> CatalogRef {
        CatalogRef::directory(CatalogUri::Root.to_string(), ROOT_NAME)
    }

    fn browse(&mut self, uri: &str) -> Vec<CatalogRef> {
        let address = match CatalogUri::parse(uri) {
            Ok(address) => address,
            Err(err) => {
                tracing::warn!("browse rejected: {err}");
                return Vec::new();
            }
        };

        self.flush_if_stale();

        if let Some(listing) = self.cache.listing(&address) {
            tracing::debug!(%uri, "serving listing from cache");
            return listing.to_vec();
        }

        match address {
            CatalogUri::Root => self.load_root(),
            CatalogUri::FeedPage(page) => self.load_track_page(TrackSource::Feed, page),
            CatalogUri::UserPage { user, page } => {
                self.load_track_page(TrackSource::User(user), page)
            }
            CatalogUri::FeedTrack { .. } | CatalogUri::UserTrack { .. } => {
                tracing::warn!(%uri, "track addresses are not browsable");
                Vec::new()
            }
        }
    }

    fn lookup(&self, uri: &str) -> Vec<Track> {
        let Ok(address) = CatalogUri::parse(uri) else {
            return Vec::new();
        };
        self.cache
            .track(&address)
            .map(|track| vec![track.clone()])
            .unwrap_or_default()
    }

    fn get_images(&self, uris: &[String]) -> HashMap<String, Vec<Image>> {
        let mut images = HashMap::new();
        for uri in uris {
            let Ok(address) = CatalogUri::parse(uri) else {
                continue;
            };
            if let Some(image) = self.cache.image(&address) {
                images.insert(uri.clone(), vec![image.clone()]);
            }
        }
        images
    }

    fn refresh(&mut self, uri: &str) {
        tracing::info!(%uri, "refresh requested");
        if uri.is_empty() {
            self.cache.flush_all();
            return;
        }
        match CatalogUri::parse(uri) {
            Ok(address) => self.cache.invalidate(&address),
            Err(err) => tracing::warn!("refresh rejected: {err}"),
        }
    }

    fn search(&mut self, _query: &SearchQuery) -> SearchResult {
        tracing::debug!("search is not supported, returning empty result");
        SearchResult::default()
    }
}

impl PlaybackTranslator for HearthisBackend {
    fn translate_uri(&self, uri: &str) -> Result<StreamUrl, TranslateError> {
        let parsed = CatalogUri::parse(uri).map_err(|_| TranslateError::NotPlayable {
            uri: uri.to_string(),
        })?;
        let Some(token) = parsed.token() else {
            return Err(TranslateError::NotPlayable {
                uri: uri.to_string(),
            });
        };
        let locator = token
            .decode()
            .map_err(|err| TranslateError::MalformedToken {
                uri: uri.to_string(),
                reason: err.to_string(),
            })?;
        tracing::debug!(%uri, "resolved stream locator");
        Ok(StreamUrl::new(locator))
    }
}
