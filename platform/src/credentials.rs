//! Persistence of the long-lived refresh token between page loads.

use std::cell::RefCell;

/// Where the hosted identity keeps the refresh token so a returning user is
/// restored without signing in again.
pub trait CredentialStore {
    fn load(&self) -> Option<String>;
    fn save(&self, refresh_token: &str);
    fn clear(&self);
}

/// Process-local store; the session is forgotten when the process ends.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RefCell<Option<String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn with_token(refresh_token: &str) -> Self {
        Self { token: RefCell::new(Some(refresh_token.to_owned())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, refresh_token: &str) {
        *self.token.borrow_mut() = Some(refresh_token.to_owned());
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}
