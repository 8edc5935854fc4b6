use std::sync::{Arc, Mutex, MutexGuard};

use super::model::{Session, User};
use super::store::SessionStore;

/// Shared handle to the current session.
///
/// Cloning is cheap; all clones observe the same state. The gateway worker
/// reads the token from its clone while the UI thread reads identity flags.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<Mutex<Session>>,
    store: Option<SessionStore>,
}

impl SessionContext {
    /// An empty, non-persistent session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session backed by `store`, seeded with whatever it holds.
    pub fn with_store(store: SessionStore) -> Self {
        let restored = store.load();
        Self {
            inner: Arc::new(Mutex::new(restored)),
            store: Some(store),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a session after a successful login or registration.
    pub fn begin(&self, token: String, user: User) {
        let snapshot = {
            let mut s = self.lock();
            s.token = Some(token);
            s.user = Some(user);
            s.clone()
        };
        tracing::info!(user = ?snapshot.user.as_ref().map(|u| u.name.as_str()), "session started");
        self.persist(&snapshot);
    }

    /// Drop credentials, both in memory and on disk.
    pub fn end(&self) {
        let was_authenticated = {
            let mut s = self.lock();
            let was = s.is_authenticated();
            *s = Session::default();
            was
        };
        if let Some(store) = &self.store {
            store.clear();
        }
        if was_authenticated {
            tracing::info!("session ended");
        }
    }

    /// Refresh the cached identity (e.g. after `GET /user`).
    pub fn update_user(&self, user: User) {
        let snapshot = {
            let mut s = self.lock();
            if !s.is_authenticated() {
                return;
            }
            s.user = Some(user);
            s.clone()
        };
        self.persist(&snapshot);
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.lock().is_admin()
    }

    fn persist(&self, session: &Session) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(session) {
                tracing::warn!(path = %store.path().display(), "failed to save session: {e}");
            }
        }
    }
}
