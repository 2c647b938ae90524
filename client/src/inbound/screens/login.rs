//! Login and logout flows.

use crate::domain::{LoginCredentials, LoginValidationError, User};
use crate::inbound::routes::Route;
use crate::inbound::state::AppState;

/// Result of submitting the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Session established; navigate to `redirect`.
    Authenticated { user: User, redirect: Route },
    /// A field was blank; nothing was sent to the session store.
    Invalid(LoginValidationError),
    /// The credentials were refused or the session could not be saved.
    Rejected { message: String },
}

/// Validate the form and log in.
pub async fn submit_login(state: &AppState, email: &str, password: &str) -> LoginOutcome {
    let credentials = match LoginCredentials::try_from_parts(email, password) {
        Ok(credentials) => credentials,
        Err(error) => return LoginOutcome::Invalid(error),
    };

    match state.session.login(&credentials).await {
        Ok(user) => LoginOutcome::Authenticated {
            user,
            redirect: Route::Dashboard,
        },
        Err(error) => LoginOutcome::Rejected {
            message: error.message().to_owned(),
        },
    }
}

/// End the session and return to the login screen.
pub fn logout(state: &AppState) -> Route {
    state.session.logout();
    Route::Login
}
