//! Application-wide session: current identity plus a one-shot loading flag.
//!
//! SYSTEM CONTEXT
//! ==============
//! The application root constructs one [`SessionContext`] and hands it down the
//! UI tree. Route guards read [`SessionContext::is_loading`] to hold redirects
//! until the provider has answered, and user-aware components read
//! [`SessionContext::current_user`].
//!
//! STATE MACHINE
//! =============
//! `loading -> settled`, one-directional. The only writer is the provider's
//! change callback; [`SessionContext::sign_out`] asks the provider to sign out
//! and waits for the resulting notification like every other change.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::channel::Subscription;
use crate::identity::Identity;
use crate::provider::{AuthError, IdentityProvider};

/// Snapshot of the session as seen by UI consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub current_user: Option<Identity>,
    pub is_loading: bool,
}

impl Session {
    /// State before the provider's first notification.
    #[must_use]
    pub fn loading() -> Self {
        Self { current_user: None, is_loading: true }
    }

    fn apply(&mut self, identity: Option<Identity>) {
        self.current_user = identity;
        self.is_loading = false;
    }
}

/// Owner of the single provider subscription for one application instance.
pub struct SessionContext {
    provider: Rc<dyn IdentityProvider>,
    state: Rc<RefCell<Session>>,
    subscription: RefCell<Option<Subscription>>,
}

impl SessionContext {
    /// Create a context subscribed to `provider`.
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self::attach(provider, |_| {})
    }

    /// Create a context and mirror every applied change into `on_update`.
    ///
    /// UI layers use the hook to push snapshots into their own reactive
    /// state; it runs after the session itself has been updated.
    pub fn attach(provider: Rc<dyn IdentityProvider>, on_update: impl Fn(&Session) + 'static) -> Self {
        let state = Rc::new(RefCell::new(Session::loading()));
        let weak = Rc::downgrade(&state);
        let subscription = provider.subscribe(Box::new(move |identity| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let snapshot = {
                let mut session = state.borrow_mut();
                session.apply(identity);
                session.clone()
            };
            log::debug!("session: settled signed_in={}", snapshot.current_user.is_some());
            on_update(&snapshot);
        }));
        Self { provider, state, subscription: RefCell::new(Some(subscription)) }
    }

    /// Latest identity delivered by the provider. Never blocks.
    #[must_use]
    pub fn current_user(&self) -> Option<Identity> {
        self.state.borrow().current_user.clone()
    }

    /// True until the provider's first notification has been applied.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Ask the provider to sign out. `current_user` is left untouched; it
    /// clears when the provider's signed-out notification arrives.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`AuthError`].
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Release the provider subscription. Idempotent; later notifications
    /// (including one currently being dispatched) are not applied.
    pub fn teardown(&self) {
        if let Some(subscription) = self.subscription.borrow_mut().take() {
            subscription.release();
            log::debug!("session: subscription released");
        }
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.borrow().as_ref().is_some_and(Subscription::is_active)
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.teardown();
    }
}
