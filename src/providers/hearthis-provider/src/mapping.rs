//! Remote track to catalog track record conversion.

use crate::models::RemoteTrack;
use crate::uri::CatalogUri;
use chrono::NaiveDateTime;
use hearthis_core::models::{LinkedName, Track};
use thiserror::Error;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single remote record that cannot be turned into a track record.
/// The browser skips the record and keeps the rest of the page.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("unparseable created_at {value:?}: {source}")]
    BadDate {
        value: String,
        source: chrono::ParseError,
    },
    #[error("unparseable duration {value:?}")]
    BadDuration { value: String },
}

/// Listing display name: zero-padded ordinal, dot, title.
pub fn display_name(ordinal: u32, title: &str) -> String {
    format!("{ordinal:02}. {title}")
}

/// Duration in whole seconds. The API serves decimal strings on some
/// endpoints; fractional seconds are truncated rather than dropping the
/// track.
fn parse_seconds(value: &str) -> Option<u64> {
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }
    let seconds = value.parse::<f64>().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds.trunc() as u64)
    } else {
        None
    }
}

/// Build the full track record for a remote track at the given 1-based
/// ordinal within the unpaginated listing. The uploading user stands in
/// for both album and artist; the service has no album concept.
pub fn map_track(
    remote: &RemoteTrack,
    ordinal: u32,
    address: &CatalogUri,
) -> Result<Track, MappingError> {
    let date = NaiveDateTime::parse_from_str(&remote.created_at, CREATED_AT_FORMAT)
        .map_err(|source| MappingError::BadDate {
            value: remote.created_at.clone(),
            source,
        })?
        .date()
        .format("%Y-%m-%d")
        .to_string();

    let seconds = parse_seconds(remote.duration.trim()).ok_or_else(|| {
        MappingError::BadDuration {
            value: remote.duration.clone(),
        }
    })?;

    // First page of the owner's own tracks, so the link stays browsable.
    let owner = CatalogUri::UserPage {
        user: remote.user.permalink.clone(),
        page: 1,
    }
    .to_string();

    Ok(Track {
        uri: address.to_string(),
        name: display_name(ordinal, &remote.title),
        album: LinkedName::new(owner.clone(), remote.user.username.clone()),
        artist: LinkedName::new(owner, remote.user.username.clone()),
        date,
        length_ms: seconds * 1000,
        track_no: ordinal,
    })
}
