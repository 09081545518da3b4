//! Browser `localStorage` persistence for the signed-in session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosted identity keeps its refresh token here so a reload restores the
//! user. Outside the browser every operation is a no-op and nothing is ever
//! restored.

use platform::CredentialStore;

/// `localStorage` key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "portal.refreshToken";

/// [`CredentialStore`] backed by `window.localStorage`.
#[derive(Debug, Default)]
pub struct BrowserCredentialStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl CredentialStore for BrowserCredentialStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(REFRESH_TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, refresh_token: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                return;
            };
            if storage.set_item(REFRESH_TOKEN_KEY, refresh_token).is_err() {
                log::warn!("persistence: could not store refresh token");
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = refresh_token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(REFRESH_TOKEN_KEY);
            }
        }
    }
}
