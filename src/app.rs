//! Application module: the view models driven by the TUI and runtime.
//!
//! The `App` struct in `app::model` owns the catalog, the admin console and
//! the sign-in forms, and routes between them according to the session.

mod admin;
mod auth;
mod catalog;
mod form;
mod model;
mod request;

pub use admin::{AdminConsole, AdminMode, DELETE_PROMPT, FILE, FileInfo, NO_UPLOADS, Notice};
pub use auth::{AuthForm, AuthKind};
pub use catalog::{CatalogState, CatalogView, EMPTY_HINT, EMPTY_TITLE};
pub use form::{Form, TextField};
pub use model::*;
pub use request::{Op, Outbox, Outcome, Reply, Request, RequestId};
