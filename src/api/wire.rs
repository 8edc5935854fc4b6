use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::User;

use super::transport::Multipart;

/// Upload payload for `POST /tracks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub file: PathBuf,
    /// Client-side hint read from the file; the server's value wins.
    pub duration: Option<u64>,
}

impl NewTrack {
    pub(super) fn to_multipart(&self) -> Multipart {
        let mut fields = vec![
            ("title".to_string(), self.title.clone()),
            ("artist".to_string(), self.artist.clone()),
            ("album".to_string(), self.album.clone()),
        ];
        if let Some(d) = self.duration {
            fields.push(("duration".to_string(), d.to_string()));
        }
        Multipart {
            fields,
            file: Some(("audio_file".to_string(), self.file.clone())),
        }
    }
}

/// Metadata patch for `PUT /tracks/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: User,
}

/// `GET /user` answers bare, or wrapped in `data` / `user`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UserEnvelope {
    Bare(User),
    Data { data: User },
    Named { user: User },
}

impl UserEnvelope {
    pub fn into_user(self) -> User {
        match self {
            UserEnvelope::Bare(u) | UserEnvelope::Data { data: u } | UserEnvelope::Named { user: u } => u,
        }
    }
}

/// Error body shape: `{ "message": ..., "errors": { field: [msg, ...] } }`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, FieldMessages>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl FieldMessages {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            FieldMessages::Many(v) => v,
            FieldMessages::One(s) => vec![s],
        }
    }
}
