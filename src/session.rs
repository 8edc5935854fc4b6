//! Client-held authentication state.
//!
//! A [`SessionContext`] is created once at startup and handed to the gateway
//! and the views. It starts on login/register and ends on logout or on any
//! authorization failure reported by the gateway.

mod context;
mod model;
mod store;

pub use context::SessionContext;
pub use model::{Session, User};
pub use store::SessionStore;

#[cfg(test)]
mod tests;
