use std::sync::mpsc::Sender;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::library::{Track, TrackEnvelope, TrackId, TrackList};
use crate::session::{SessionContext, User};

use super::transport::{ApiRequest, ApiResponse, Body, Method, Transport};
use super::wire::{AuthResponse, Credentials, ErrorBody, NewTrack, Registration, TrackUpdate, UserEnvelope};

/// Raised when the backend stops accepting the session's token.
///
/// The gateway has already cleared the session when this is sent; the
/// runtime only needs to move the user to the sign-in view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthSignal {
    Unauthorized,
}

pub struct Gateway<T> {
    transport: T,
    session: SessionContext,
    signals: Sender<AuthSignal>,
}

impl<T: Transport> Gateway<T> {
    pub fn new(transport: T, session: SessionContext, signals: Sender<AuthSignal>) -> Self {
        Self {
            transport,
            session,
            signals,
        }
    }

    /// `GET /tracks`. Public; works without a session.
    pub fn list_tracks(&self) -> Result<Vec<Track>, ApiError> {
        let body = self.call(Method::Get, "tracks", Body::Empty)?;
        decode::<TrackList>(&body, "tracks").map(TrackList::into_tracks)
    }

    /// `POST /tracks` as multipart with the audio file attached.
    pub fn create_track(&self, track: &NewTrack) -> Result<Track, ApiError> {
        let body = self.call(Method::Post, "tracks", Body::Multipart(track.to_multipart()))?;
        decode::<TrackEnvelope>(&body, "tracks").map(TrackEnvelope::into_track)
    }

    /// `PUT /tracks/{id}` with a JSON metadata patch.
    pub fn update_track(&self, id: TrackId, update: &TrackUpdate) -> Result<Track, ApiError> {
        let body = self.call(Method::Put, &format!("tracks/{id}"), json(update)?)?;
        decode::<TrackEnvelope>(&body, "tracks").map(TrackEnvelope::into_track)
    }

    /// `DELETE /tracks/{id}`.
    pub fn delete_track(&self, id: TrackId) -> Result<(), ApiError> {
        self.call(Method::Delete, &format!("tracks/{id}"), Body::Empty)
            .map(|_| ())
    }

    /// `POST /login`; starts the session on success.
    pub fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = self.call(Method::Post, "login", json(credentials)?)?;
        self.begin_session(&body, "login")
    }

    /// `POST /register`; starts the session on success.
    pub fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let body = self.call(Method::Post, "register", json(registration)?)?;
        self.begin_session(&body, "register")
    }

    /// `POST /logout`. The local session ends even when the call fails.
    pub fn logout(&self) -> Result<(), ApiError> {
        let result = if self.session.is_authenticated() {
            self.call(Method::Post, "logout", Body::Empty).map(|_| ())
        } else {
            Ok(())
        };
        self.session.end();
        result
    }

    /// `GET /user`; refreshes the cached identity.
    pub fn current_user(&self) -> Result<User, ApiError> {
        let body = self.call(Method::Get, "user", Body::Empty)?;
        let user = decode::<UserEnvelope>(&body, "user")?.into_user();
        self.session.update_user(user.clone());
        Ok(user)
    }

    fn begin_session(&self, body: &str, label: &str) -> Result<User, ApiError> {
        let auth: AuthResponse = decode(body, label)?;
        self.session.begin(auth.token, auth.user.clone());
        Ok(auth.user)
    }

    fn call(&self, method: Method, path: &str, body: Body) -> Result<String, ApiError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: self.session.token(),
            body,
        };
        tracing::debug!(?method, path, authenticated = request.bearer.is_some(), "api request");

        let response = self.transport.send(&request).map_err(|e| {
            tracing::warn!(?method, path, "api transport failure: {e}");
            ApiError::Network(e.to_string())
        })?;

        self.classify(&request, response)
    }

    fn classify(&self, request: &ApiRequest, response: ApiResponse) -> Result<String, ApiError> {
        let status = response.status;
        if (200..300).contains(&status) {
            return Ok(response.body);
        }

        let parsed: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
        tracing::warn!(
            method = ?request.method,
            path = request.path.as_str(),
            status,
            message = parsed.message.as_deref().unwrap_or(""),
            "api request rejected"
        );

        // Only a request that carried a token can lose a session; a 401 on
        // an anonymous call (bad login) is reported like any other rejection.
        if status == 401 && request.bearer.is_some() {
            self.session.end();
            tracing::info!(path = request.path.as_str(), "token rejected; session cleared");
            let _ = self.signals.send(AuthSignal::Unauthorized);
            return Err(ApiError::Unauthorized);
        }

        if status == 422 {
            return Err(ApiError::Validation {
                message: parsed.message,
                fields: parsed
                    .errors
                    .into_iter()
                    .map(|(k, v)| (k, v.into_vec()))
                    .collect(),
            });
        }

        Err(ApiError::Unknown {
            status: Some(status),
            message: parsed.message,
        })
    }
}

fn json<S: serde::Serialize>(value: &S) -> Result<Body, ApiError> {
    serde_json::to_value(value)
        .map(Body::Json)
        .map_err(|e| ApiError::Unknown {
            status: None,
            message: Some(format!("failed to encode request: {e}")),
        })
}

fn decode<D: DeserializeOwned>(body: &str, label: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!("decode /{label} response: {e}");
        ApiError::Unknown {
            status: None,
            message: Some(format!("Unexpected response from /{label}")),
        }
    })
}
