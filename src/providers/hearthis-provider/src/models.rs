//! Wire models for the hearthis.at v2 API.

use serde::{Deserialize, Deserializer};

/// Successful `POST /login/` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub secret: String,
    pub key: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// One entry of `GET /{user}/following/`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedUser {
    pub permalink: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// One entry of `GET /feed` or `GET /{user}?type=tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTrack {
    pub title: String,
    pub stream_url: String,
    #[serde(default)]
    pub artwork_url: Option<String>,
    pub user: RemoteUser,
    /// `YYYY-MM-DD HH:MM:SS`; validated during mapping, not here.
    pub created_at: String,
    /// Seconds. The API serves this as either a number or a decimal
    /// string depending on endpoint; normalized to a string here and
    /// parsed during mapping so one bad value cannot sink a whole page.
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub permalink: String,
    pub username: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        // Whole seconds; fractional durations lose the sub-second part.
        Raw::Float(n) => (n.trunc() as i64).to_string(),
    })
}
