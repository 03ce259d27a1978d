//! Catalog address grammar and the stream-locator token codec.
//!
//! Every address the host hands us is one of five shapes under the
//! `hearthissimple:` scheme:
//!
//! - `hearthissimple:root`
//! - `hearthissimple:feed:<page>`
//! - `hearthissimple:feed:<page>:<token>`
//! - `hearthissimple:user:<userId>:<page>`
//! - `hearthissimple:user:<userId>:<page>:<token>`
//!
//! `CatalogUri` is the single source of truth for that grammar: parsing
//! and formatting round-trip, and the enum doubles as the cache key so
//! no other module touches the raw strings.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;
use thiserror::Error;

/// URI scheme token for every catalog address.
pub const SCHEME: &str = "hearthissimple";

/// An external stream locator encoded for embedding in a catalog
/// address. The base64url alphabet contains no `:`, so the token never
/// collides with the address delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamToken(String);

impl StreamToken {
    /// Encode a remote stream locator. Total: any byte sequence
    /// round-trips, including `:` and non-ASCII.
    pub fn encode(locator: &str) -> Self {
        Self(URL_SAFE_NO_PAD.encode(locator))
    }

    /// Recover the original locator. Fails only for tokens this system
    /// did not produce.
    pub fn decode(&self) -> Result<String, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(TokenError::Encoding)?;
        String::from_utf8(bytes).map_err(TokenError::Utf8)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token encoding: {0}")]
    Encoding(base64::DecodeError),
    #[error("decoded locator is not valid UTF-8: {0}")]
    Utf8(std::string::FromUtf8Error),
}

/// A parsed catalog address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogUri {
    Root,
    FeedPage(u32),
    FeedTrack {
        page: u32,
        token: StreamToken,
    },
    UserPage {
        user: String,
        page: u32,
    },
    UserTrack {
        user: String,
        page: u32,
        token: StreamToken,
    },
}

#[derive(Debug, Error)]
pub enum UriError {
    #[error("address does not use the {SCHEME} scheme: {uri}")]
    Scheme { uri: String },
    #[error("unrecognized address shape: {uri}")]
    Shape { uri: String },
    #[error("invalid page number {value:?} in {uri}")]
    Page { uri: String, value: String },
}

impl CatalogUri {
    pub fn parse(uri: &str) -> Result<Self, UriError> {
        let rest = uri.strip_prefix(SCHEME).and_then(|r| r.strip_prefix(':'));
        let Some(rest) = rest else {
            return Err(UriError::Scheme { uri: uri.into() });
        };

        let segments: Vec<&str> = rest.split(':').collect();
        match segments.as_slice() {
            ["root"] => Ok(Self::Root),
            ["feed", page] => Ok(Self::FeedPage(parse_page(uri, page)?)),
            // The token is always the final segment; base64url never
            // contains `:`, so a four-segment feed address is unambiguous.
            ["feed", page, token] => Ok(Self::FeedTrack {
                page: parse_page(uri, page)?,
                token: StreamToken(token.to_string()),
            }),
            ["user", user, page] if !user.is_empty() => Ok(Self::UserPage {
                user: user.to_string(),
                page: parse_page(uri, page)?,
            }),
            ["user", user, page, token] if !user.is_empty() => Ok(Self::UserTrack {
                user: user.to_string(),
                page: parse_page(uri, page)?,
                token: StreamToken(token.to_string()),
            }),
            _ => Err(UriError::Shape { uri: uri.into() }),
        }
    }

    /// The encoded stream token, when this address is a playable track.
    pub fn token(&self) -> Option<&StreamToken> {
        match self {
            Self::FeedTrack { token, .. } | Self::UserTrack { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn is_track(&self) -> bool {
        self.token().is_some()
    }
}

fn parse_page(uri: &str, value: &str) -> Result<u32, UriError> {
    match value.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(UriError::Page {
            uri: uri.into(),
            value: value.into(),
        }),
    }
}

impl fmt::Display for CatalogUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "{SCHEME}:root"),
            Self::FeedPage(page) => write!(f, "{SCHEME}:feed:{page}"),
            Self::FeedTrack { page, token } => write!(f, "{SCHEME}:feed:{page}:{token}"),
            Self::UserPage { user, page } => write!(f, "{SCHEME}:user:{user}:{page}"),
            Self::UserTrack { user, page, token } => {
                write!(f, "{SCHEME}:user:{user}:{page}:{token}")
            }
        }
    }
}

/// Which paginated remote listing a browse is materializing. Bridges the
/// address grammar and the remote fetcher's path construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackSource {
    /// The logged-in user's social feed (`/feed`).
    Feed,
    /// A followed user's own tracks (`/{user}?type=tracks`).
    User(String),
}

impl TrackSource {
    pub fn page_uri(&self, page: u32) -> CatalogUri {
        match self {
            Self::Feed => CatalogUri::FeedPage(page),
            Self::User(user) => CatalogUri::UserPage {
                user: user.clone(),
                page,
            },
        }
    }

    pub fn track_uri(&self, page: u32, token: StreamToken) -> CatalogUri {
        match self {
            Self::Feed => CatalogUri::FeedTrack { page, token },
            Self::User(user) => CatalogUri::UserTrack {
                user: user.clone(),
                page,
                token,
            },
        }
    }
}
