//! Remote work requested by the views and the results that come back.
//!
//! Views never call the gateway directly: they queue an [`Op`] in the
//! [`Outbox`] and later receive a [`Reply`] carrying the same [`RequestId`].
//! A view only accepts a reply whose id it is still waiting for, so results
//! that arrive after the view moved on are dropped.

use crate::api::{Credentials, Gateway, NewTrack, Registration, TrackUpdate, Transport};
use crate::error::ApiError;
use crate::library::{Track, TrackId};
use crate::session::User;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    ListTracks,
    CreateTrack(NewTrack),
    UpdateTrack(TrackId, TrackUpdate),
    DeleteTrack(TrackId),
    Login(Credentials),
    Register(Registration),
    Logout,
    CurrentUser,
}

impl Op {
    /// Short label for logs. Never includes request bodies (passwords).
    pub fn name(&self) -> &'static str {
        match self {
            Op::ListTracks => "list_tracks",
            Op::CreateTrack(_) => "create_track",
            Op::UpdateTrack(..) => "update_track",
            Op::DeleteTrack(_) => "delete_track",
            Op::Login(_) => "login",
            Op::Register(_) => "register",
            Op::Logout => "logout",
            Op::CurrentUser => "current_user",
        }
    }

    /// Run the operation against `gateway`. Blocks for the whole round trip.
    pub fn perform<T: Transport>(self, gateway: &Gateway<T>) -> Outcome {
        match self {
            Op::ListTracks => Outcome::Tracks(gateway.list_tracks()),
            Op::CreateTrack(track) => Outcome::Created(gateway.create_track(&track)),
            Op::UpdateTrack(id, update) => Outcome::Updated(gateway.update_track(id, &update)),
            Op::DeleteTrack(id) => Outcome::Deleted(id, gateway.delete_track(id)),
            Op::Login(credentials) => Outcome::SignedIn(gateway.login(&credentials)),
            Op::Register(registration) => Outcome::SignedIn(gateway.register(&registration)),
            Op::Logout => {
                if let Err(e) = gateway.logout() {
                    tracing::warn!("remote logout failed: {}", e.detail());
                }
                Outcome::LoggedOut
            }
            Op::CurrentUser => Outcome::CurrentUser(gateway.current_user()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub op: Op,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Tracks(Result<Vec<Track>, ApiError>),
    Created(Result<Track, ApiError>),
    Updated(Result<Track, ApiError>),
    Deleted(TrackId, Result<(), ApiError>),
    SignedIn(Result<User, ApiError>),
    LoggedOut,
    CurrentUser(Result<User, ApiError>),
}

impl Outcome {
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Tracks(Err(e))
            | Outcome::Created(Err(e))
            | Outcome::Updated(Err(e))
            | Outcome::Deleted(_, Err(e))
            | Outcome::SignedIn(Err(e))
            | Outcome::CurrentUser(Err(e)) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub id: RequestId,
    pub outcome: Outcome,
}

/// Requests queued by the views since the runtime last drained them.
#[derive(Debug, Default)]
pub struct Outbox {
    next: u64,
    queued: Vec<Request>,
}

impl Outbox {
    pub fn push(&mut self, op: Op) -> RequestId {
        self.next += 1;
        let id = RequestId(self.next);
        self.queued.push(Request { id, op });
        id
    }

    pub fn queued(&self) -> &[Request] {
        &self.queued
    }

    pub fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.queued)
    }
}
