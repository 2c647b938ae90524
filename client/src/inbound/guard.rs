//! Authentication gate for protected routes.

use std::sync::Arc;

use tracing::debug;

use crate::domain::SessionStore;
use crate::inbound::routes::Route;

/// What the front end should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session initialisation is still pending; show a neutral placeholder.
    Loading,
    /// Navigate elsewhere instead.
    Redirect(Route),
    /// Show the requested screen.
    Render(Route),
}

/// Consults the session on every navigation.
#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Decide how to handle a request for `route`.
    pub fn decide(&self, route: Route) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render(route);
        }
        if !self.session.is_initialized() {
            return GuardDecision::Loading;
        }
        if self.session.is_authenticated() {
            GuardDecision::Render(route)
        } else {
            debug!(%route, "no session; redirecting to login");
            GuardDecision::Redirect(Route::Login)
        }
    }

    /// Resolve `path` and decide in one step.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        self.decide(Route::resolve(path))
    }
}
