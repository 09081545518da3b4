//! Reactive session state and the platform services behind it.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionContext` lives outside the reactive graph. `Services::connect`
//! attaches a callback that copies every session change into a
//! `SessionState` sink (an `RwSignal` in the app), so route guards and
//! user-aware components can track it like any other signal.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::rc::Rc;

use leptos::prelude::*;
use platform::{BlobStore, DocumentStore};
use session::{Identity, IdentityProvider, Session, SessionContext};

/// Snapshot of the session as seen by the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<Identity>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl SessionState {
    /// Loading finished and nobody is signed in.
    pub fn is_signed_out(&self) -> bool {
        !self.loading && self.user.is_none()
    }

    /// Loading finished and the user may enter the app.
    pub fn is_verified(&self) -> bool {
        !self.loading && self.user.as_ref().is_some_and(|u| u.email_verified)
    }
}

impl From<&Session> for SessionState {
    fn from(session: &Session) -> Self {
        Self { user: session.current_user.clone(), loading: session.is_loading }
    }
}

/// Platform services shared by pages and components.
#[derive(Clone)]
pub struct Services {
    pub identity: Rc<dyn IdentityProvider>,
    pub documents: Rc<dyn DocumentStore>,
    pub blobs: Rc<dyn BlobStore>,
    pub session: Rc<SessionContext>,
}

impl Services {
    /// Attach a session context to `identity` and forward its changes to `sink`.
    pub fn connect(
        identity: Rc<dyn IdentityProvider>,
        documents: Rc<dyn DocumentStore>,
        blobs: Rc<dyn BlobStore>,
        sink: impl Fn(SessionState) + 'static,
    ) -> Self {
        let session = SessionContext::attach(identity.clone(), move |s| sink(SessionState::from(s)));
        Self { identity, documents, blobs, session: Rc::new(session) }
    }

    /// Stop listening for identity changes. Safe to call more than once.
    pub fn teardown(&self) {
        self.session.teardown();
    }
}

/// Context handle for [`Services`].
///
/// The services hold `Rc`s, so they live in local arena storage. The handle is
/// `None` during server rendering and when the platform config is missing.
pub type ServicesHandle = StoredValue<Option<Services>, LocalStorage>;

/// One-shot message carried across a navigation (e.g. signup to login).
#[derive(Clone, Copy)]
pub struct Notice(pub RwSignal<Option<String>>);

impl Notice {
    /// Take the pending message, leaving none behind.
    pub fn take(self) -> Option<String> {
        let message = self.0.get_untracked();
        if message.is_some() {
            self.0.set(None);
        }
        message
    }
}
