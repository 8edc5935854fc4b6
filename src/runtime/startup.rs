use crate::config::{self, SessionSettings};
use crate::session::{SessionContext, SessionStore};

/// Build the session handle for this run, restoring a saved session when
/// persistence is enabled.
pub fn session_context(settings: &SessionSettings) -> SessionContext {
    if !settings.persist {
        return SessionContext::new();
    }

    let path = settings
        .path
        .clone()
        .or_else(|| config::state_dir().map(|d| d.join("session.toml")));

    match path {
        Some(path) => {
            let session = SessionContext::with_store(SessionStore::new(path));
            if session.is_authenticated() {
                tracing::info!("restored saved session");
            }
            session
        }
        None => {
            tracing::warn!("no state directory; session will not be saved");
            SessionContext::new()
        }
    }
}
