//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components apply identical redirect behavior. Every redirect waits
//! for the session to finish loading, so a restored user never sees the
//! login page flash by.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Whether a protected page should send the visitor to `/login`.
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    state.is_signed_out()
}

/// Whether the login page should forward the visitor into the app.
pub fn should_enter_app(state: &SessionState) -> bool {
    state.is_verified()
}

/// Auth redirects replace the current history entry, so Back does not
/// return to a page the visitor was bounced from.
pub fn redirect_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Redirect to `/login` whenever the session has loaded and no user is present.
pub fn install_unauth_redirect<F>(session: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session.get()) {
            navigate(LOGIN_PATH, redirect_options());
        }
    });
}

/// Redirect to `/` once a verified user is signed in.
pub fn install_verified_redirect<F>(session: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_enter_app(&session.get()) {
            navigate(HOME_PATH, redirect_options());
        }
    });
}
