//! Session management and the remote fetcher.
//!
//! One blocking HTTP client with a bounded timeout serves both the
//! startup login and the authenticated, paginated catalog fetches. All
//! failures come back as typed errors; converting them into empty
//! listings is the browser's job, not ours.

use crate::models::{FollowedUser, LoginResponse, RemoteTrack};
use crate::uri::TrackSource;
use hearthis_core::redact::redact_secrets;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Fixed page size for every paginated remote call.
pub const PAGE_SIZE: u32 = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Account credentials handed in at construction.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Session state produced by a successful login. Never refreshed: a
/// backend either has one for its whole lifetime or runs degraded.
#[derive(Debug, Clone)]
pub struct Session {
    pub secret: String,
    pub key: String,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL {url}: {source}")]
    BaseUrl { url: String, source: url::ParseError },
    #[error("failed to build HTTP client: {0}")]
    Http(reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Transport(reqwest::Error),
    #[error("login rejected with HTTP status {status}")]
    Rejected { status: u16 },
    #[error("login response did not parse: {0}")]
    Parse(reqwest::Error),
    #[error("invalid login path: {0}")]
    Path(url::ParseError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("remote returned HTTP status {status}")]
    Status { status: u16 },
    #[error("response body did not parse: {0}")]
    Parse(reqwest::Error),
    #[error("invalid request path {path}: {source}")]
    Path { path: String, source: url::ParseError },
}

/// Blocking client for the hearthis.at v2 API.
pub struct HearthisClient {
    http: reqwest::blocking::Client,
    base_url: Url,
}

impl HearthisClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // A trailing slash keeps Url::join appending instead of
        // replacing the last path segment.
        let mut normalized = base_url.trim_end_matches('/').to_string();
        normalized.push('/');
        let base_url = Url::parse(&normalized).map_err(|source| ClientError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Http)?;
        Ok(Self { http, base_url })
    }

    /// `POST /login/` with the account credentials. Runs exactly once,
    /// at backend construction.
    pub fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = self.base_url.join("login/").map_err(AuthError::Path)?;
        let resp = self
            .http
            .post(url)
            .form(&[
                ("email", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .map_err(AuthError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
            });
        }
        let body: LoginResponse = resp.json().map_err(AuthError::Parse)?;
        tracing::debug!(username = %body.username, "login accepted");
        Ok(Session {
            secret: body.secret,
            key: body.key,
            username: body.username,
            avatar_url: body.avatar_url,
        })
    }

    /// Page of users the logged-in account follows.
    pub fn following(&self, session: &Session, page: u32) -> Result<Vec<FollowedUser>, FetchError> {
        self.get_page(session, &format!("{}/following/", session.username), &[], page)
    }

    /// Page of tracks for the feed or a followed user.
    pub fn tracks(
        &self,
        session: &Session,
        source: &TrackSource,
        page: u32,
    ) -> Result<Vec<RemoteTrack>, FetchError> {
        match source {
            TrackSource::Feed => self.get_page(session, "feed", &[], page),
            TrackSource::User(user) => self.get_page(session, user, &[("type", "tracks")], page),
        }
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        extra: &[(&str, &str)],
        page: u32,
    ) -> Result<Vec<T>, FetchError> {
        let url = self.base_url.join(path).map_err(|source| FetchError::Path {
            path: path.to_string(),
            source,
        })?;
        tracing::debug!(url = %redact_secrets(url.as_str()), page, "remote fetch");

        let mut query: Vec<(&str, String)> = vec![
            ("secret", session.secret.clone()),
            ("key", session.key.clone()),
            ("count", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ];
        for (name, value) in extra {
            query.push((name, (*value).to_string()));
        }

        let resp = self
            .http
            .get(url)
            .query(&query)
            .send()
            .map_err(FetchError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        resp.json().map_err(FetchError::Parse)
    }
}
