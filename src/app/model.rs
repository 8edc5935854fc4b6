//! Application model: `App` and `Route`.
//!
//! The `App` owns every view, the outbox of pending remote work and a
//! handle to the session. It is only ever touched from the UI thread.

use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::session::SessionContext;

use super::admin::AdminConsole;
use super::auth::AuthForm;
use super::catalog::{CatalogState, CatalogView};
use super::request::{Op, Outbox, Outcome, Reply, RequestId};

pub const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";
pub const ADMIN_ONLY: &str = "Admin access required.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Catalog,
    Admin,
    Login,
    Register,
}

impl Route {
    pub fn label(self) -> &'static str {
        match self {
            Route::Catalog => "Library",
            Route::Admin => "Admin",
            Route::Login => "Sign in",
            Route::Register => "Register",
        }
    }
}

/// The main application model.
pub struct App {
    route: Route,
    pub session: SessionContext,
    pub catalog: CatalogView,
    pub admin: AdminConsole,
    pub login: AuthForm,
    pub register: AuthForm,
    /// One-line message under the header (welcome, redirects, expiry).
    pub flash: Option<String>,
    pub outbox: Outbox,
    pub quit: bool,

    revalidate: Option<RequestId>,
    logout: Option<RequestId>,
}

impl App {
    pub fn new(session: SessionContext, settings: &Settings) -> Self {
        Self {
            route: Route::Catalog,
            session,
            catalog: CatalogView::new(),
            admin: AdminConsole::new(
                settings.admin.clone(),
                Duration::from_secs(settings.ui.notice_seconds),
            ),
            login: AuthForm::login(),
            register: AuthForm::register(),
            flash: None,
            outbox: Outbox::default(),
            quit: false,
            revalidate: None,
            logout: None,
        }
    }

    /// First display: check a restored session is still accepted, then load
    /// the catalog. Requests run in order, so an expired token is dropped
    /// before the list is fetched.
    pub fn start(&mut self) {
        if self.session.is_authenticated() {
            self.revalidate = Some(self.outbox.push(Op::CurrentUser));
        }
        self.catalog.load(&mut self.outbox);
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Whether the current route takes free text input.
    pub fn in_form(&self) -> bool {
        match self.route {
            Route::Login | Route::Register => true,
            Route::Admin => self.admin.in_form(),
            Route::Catalog => false,
        }
    }

    /// Move to `route`, subject to the session.
    ///
    /// Admin needs an admin session; anonymous users are sent to sign in
    /// and everyone else back to the catalog. Signed-in users never see the
    /// sign-in forms.
    pub fn navigate(&mut self, route: Route) {
        self.flash = None;
        let target = match route {
            Route::Admin if !self.session.is_authenticated() => {
                self.flash = Some(ADMIN_ONLY.to_string());
                Route::Login
            }
            Route::Admin if !self.session.is_admin() => {
                self.flash = Some(ADMIN_ONLY.to_string());
                Route::Catalog
            }
            Route::Login | Route::Register if self.session.is_authenticated() => Route::Catalog,
            other => other,
        };

        if target == Route::Admin && self.route != Route::Admin {
            self.admin.load(&mut self.outbox);
            self.admin.refresh_candidates();
        }
        tracing::debug!(from = ?self.route, to = ?target, "navigate");
        self.route = target;
    }

    pub fn logout(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        self.logout = Some(self.outbox.push(Op::Logout));
        self.admin.reset();
        if self.route == Route::Admin {
            self.route = Route::Catalog;
        }
    }

    /// The gateway reported the token is no longer valid. The session has
    /// already been cleared; drop admin state and ask for credentials.
    pub fn handle_unauthorized(&mut self) {
        tracing::info!(route = ?self.route, "unauthorized; returning to sign in");
        self.admin.reset();
        self.login.reset();
        self.register.reset();
        self.revalidate = None;
        // The catalog is public; a list that failed on the stale token is
        // fetched again anonymously.
        if self.catalog.is_loading() || matches!(self.catalog.state, CatalogState::Failed(_)) {
            self.catalog.load(&mut self.outbox);
        }
        self.route = Route::Login;
        self.flash = Some(SESSION_EXPIRED.to_string());
    }

    /// Apply a finished remote request to whichever view is waiting for it.
    pub fn apply(&mut self, reply: Reply, now: Instant) {
        let Reply { id, outcome } = reply;
        match &outcome {
            Outcome::Tracks(result) => {
                if !self.catalog.receive(id, result) {
                    self.admin.receive_tracks(id, result);
                }
            }
            Outcome::Created(result) => {
                if self.admin.receive_created(id, result, now, &mut self.outbox) {
                    self.catalog.load(&mut self.outbox);
                }
            }
            Outcome::Updated(result) => {
                if let Some(track) = self.admin.receive_updated(id, result, now) {
                    self.catalog.replace(&track);
                }
            }
            Outcome::Deleted(track, result) => {
                if let Some(removed) = self.admin.receive_deleted(id, *track, result) {
                    self.catalog.remove(removed);
                }
            }
            Outcome::SignedIn(result) => {
                let user = self
                    .login
                    .receive(id, result)
                    .or_else(|| self.register.receive(id, result));
                if let Some(user) = user {
                    self.route = Route::Catalog;
                    self.flash = Some(format!("Welcome, {}!", user.name));
                }
            }
            Outcome::LoggedOut => {
                if self.logout == Some(id) {
                    self.logout = None;
                    self.route = Route::Login;
                    self.flash = Some("Signed out.".to_string());
                }
            }
            Outcome::CurrentUser(result) => {
                if self.revalidate == Some(id) {
                    self.revalidate = None;
                    if let Err(e) = result {
                        if !e.is_unauthorized() {
                            tracing::warn!("could not confirm session: {}", e.detail());
                        }
                    }
                }
            }
        }
        self.enforce_gate();
    }

    /// Expire notices and make sure the route still matches the session.
    pub fn tick(&mut self, now: Instant) {
        self.admin.tick(now);
        self.enforce_gate();
    }

    fn enforce_gate(&mut self) {
        if self.route == Route::Admin && !self.session.is_admin() {
            self.admin.reset();
            self.route = if self.session.is_authenticated() {
                Route::Catalog
            } else {
                Route::Login
            };
        }
    }
}
