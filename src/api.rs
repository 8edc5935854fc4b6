//! Remote data gateway.
//!
//! [`Gateway`] is the only code that talks to the backend. It attaches the
//! bearer token, maps responses onto [`ApiError`](crate::error::ApiError)
//! and, when a token stops being accepted, clears the session and raises an
//! [`AuthSignal`] for the runtime to act on.

mod gateway;
mod transport;
mod wire;

pub use gateway::{AuthSignal, Gateway};
pub use transport::{ApiRequest, ApiResponse, Body, HttpTransport, Method, Multipart, Transport, TransportError};
pub use wire::{Credentials, NewTrack, Registration, TrackUpdate};
