use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned track identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The user who uploaded a track. Read-only from the client's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub id: u64,
    pub name: String,
}

/// A single audio asset in the remote library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Whole seconds, as recorded by the server.
    #[serde(default, deserialize_with = "number_or_string")]
    pub duration: Option<u64>,
    /// Where the audio payload can be fetched from. Empty when the server
    /// has none; such a track is listed but cannot play.
    #[serde(rename = "bunny_url", alias = "audio_url", deserialize_with = "string_or_null")]
    pub audio_url: String,
    #[serde(default)]
    pub uploader: Option<Uploader>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub file_size: Option<u64>,
}

impl Track {
    /// Artist with blank values treated as missing.
    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Album with blank values treated as missing.
    pub fn album(&self) -> Option<&str> {
        self.album.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn has_audio_source(&self) -> bool {
        !self.audio_url.trim().is_empty()
    }
}

/// One entry of a track listing. A row that does not decode as a track is
/// kept aside so it cannot fail the rest of the list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrackRow {
    Track(Track),
    Malformed(IgnoredAny),
}

/// `GET /tracks` answers either with a bare array or a `{ "data": [...] }`
/// envelope depending on the backend's resource wrapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrackList {
    Bare(Vec<TrackRow>),
    Wrapped { data: Vec<TrackRow> },
}

impl TrackList {
    /// The decodable tracks, in server order.
    pub fn into_tracks(self) -> Vec<Track> {
        let rows = match self {
            TrackList::Bare(v) => v,
            TrackList::Wrapped { data } => data,
        };
        let total = rows.len();
        let tracks: Vec<Track> = rows
            .into_iter()
            .filter_map(|row| match row {
                TrackRow::Track(t) => Some(t),
                TrackRow::Malformed(_) => None,
            })
            .collect();
        if tracks.len() < total {
            tracing::warn!(skipped = total - tracks.len(), "ignoring malformed track rows");
        }
        tracks
    }
}

/// Single-resource responses may be wrapped the same way.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TrackEnvelope {
    Bare(Track),
    Wrapped { data: Track },
}

impl TrackEnvelope {
    pub fn into_track(self) -> Track {
        match self {
            TrackEnvelope::Bare(t) => t,
            TrackEnvelope::Wrapped { data } => data,
        }
    }
}

// Some backends serialise big integers as strings (`"file_size": "1048576"`).
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let from_float = |f: f64| (f.is_finite() && f >= 0.0).then(|| f.round() as u64);
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Float(f)) => from_float(f),
        Some(Raw::Text(s)) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        Some(Raw::Other(_)) | None => None,
    })
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
