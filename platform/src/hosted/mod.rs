//! REST client for the hosted backend-as-a-service.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`HostedPlatform`] is built per application instance from
//! [`PlatformConfig`]. It hands out the identity provider plus the document
//! and blob stores, which share the signed-in user's tokens so storage calls
//! run as that user.
//!
//! TOKENS
//! ======
//! The short-lived id token is renewed from the refresh token shortly before
//! it expires. The refresh token is persisted through [`CredentialStore`] so
//! [`HostedIdentity::restore`] can bring a returning user back.

pub mod blobs;
pub mod documents;
pub mod identity;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use session::Identity;
use time::{Duration, OffsetDateTime};

use crate::config::PlatformConfig;
use crate::credentials::CredentialStore;
use crate::error::StoreError;

pub use blobs::HostedBlobs;
pub use documents::HostedDocuments;
pub use identity::HostedIdentity;

/// Renew the id token when it has less than this much life left.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Entry point: the three hosted services sharing one HTTP client and one
/// set of user credentials.
pub struct HostedPlatform {
    shared: Rc<Shared>,
    identity: Rc<HostedIdentity>,
}

impl HostedPlatform {
    pub fn new(config: PlatformConfig, credential_store: Rc<dyn CredentialStore>) -> Self {
        let shared = Rc::new(Shared {
            config,
            http: reqwest::Client::new(),
            credentials: RefCell::new(None),
            epoch: Cell::new(0),
            credential_store,
        });
        let identity = Rc::new(HostedIdentity::new(shared.clone()));
        Self { shared, identity }
    }

    #[must_use]
    pub fn identity(&self) -> Rc<HostedIdentity> {
        self.identity.clone()
    }

    #[must_use]
    pub fn documents(&self) -> Rc<HostedDocuments> {
        Rc::new(HostedDocuments::new(self.shared.clone()))
    }

    #[must_use]
    pub fn blobs(&self) -> Rc<HostedBlobs> {
        Rc::new(HostedBlobs::new(self.shared.clone()))
    }
}

/// Tokens for the signed-in user.
#[derive(Clone, Debug)]
pub(crate) struct Credentials {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: OffsetDateTime,
}

impl Credentials {
    fn expires_soon(&self, now: OffsetDateTime) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Response of the refresh-token grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenGrant {
    pub id_token: String,
    pub refresh_token: String,
    pub user_id: String,
    #[serde(default)]
    pub expires_in: String,
}

pub(crate) struct Shared {
    pub config: PlatformConfig,
    pub http: reqwest::Client,
    credentials: RefCell<Option<Credentials>>,
    /// Bumped on every sign-in and sign-out.
    epoch: Cell<u64>,
    credential_store: Rc<dyn CredentialStore>,
}

impl Shared {
    pub fn current(&self) -> Option<Credentials> {
        self.credentials.borrow().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Adopt new credentials and persist the refresh token.
    pub fn install(&self, credentials: Credentials) {
        self.epoch.set(self.epoch.get() + 1);
        self.credential_store.save(&credentials.refresh_token);
        *self.credentials.borrow_mut() = Some(credentials);
    }

    /// Like [`Shared::install`], unless a sign-in or sign-out happened since
    /// `epoch` was read. Returns whether the credentials were adopted.
    pub fn install_if_current(&self, epoch: u64, credentials: Credentials) -> bool {
        if self.epoch.get() != epoch {
            return false;
        }
        self.install(credentials);
        true
    }

    pub fn forget(&self) {
        self.epoch.set(self.epoch.get() + 1);
        self.credential_store.clear();
        self.credentials.borrow_mut().take();
    }

    pub fn stored_refresh_token(&self) -> Option<String> {
        self.credential_store.load()
    }

    /// Current id token, renewed first if it is about to expire. `None` when
    /// nobody is signed in.
    pub async fn bearer(&self) -> Result<Option<String>, StoreError> {
        let Some(credentials) = self.current() else {
            return Ok(None);
        };
        let epoch = self.epoch();
        if !credentials.expires_soon(OffsetDateTime::now_utc()) {
            return Ok(Some(credentials.id_token));
        }
        let grant = identity::exchange_refresh_token(self, &credentials.refresh_token)
            .await
            .map_err(|err| {
                log::warn!("hosted: id token refresh failed: {err}");
                StoreError::Unauthenticated
            })?;
        let renewed = Credentials {
            identity: credentials.identity,
            id_token: grant.id_token,
            refresh_token: grant.refresh_token,
            expires_at: expiry_from(&grant.expires_in, OffsetDateTime::now_utc()),
        };
        let token = renewed.id_token.clone();
        // Keep the renewal only for the session it was requested for.
        if !self.install_if_current(epoch, renewed) {
            return Err(StoreError::Unauthenticated);
        }
        Ok(Some(token))
    }
}

/// Absolute expiry from the service's `expiresIn` seconds string.
pub(crate) fn expiry_from(expires_in: &str, now: OffsetDateTime) -> OffsetDateTime {
    let secs = expires_in.trim().parse::<i64>().unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
    now + Duration::seconds(secs)
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Service error message from a `{"error": {"message": ...}}` body, falling
/// back to the raw body text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}

/// Map a failed storage response to [`StoreError`].
pub(crate) fn status_error(status: u16, body: &str, path: &str) -> StoreError {
    match status {
        401 => StoreError::Unauthenticated,
        403 => StoreError::PermissionDenied(error_message(body)),
        404 => StoreError::NotFound { path: path.to_owned() },
        _ => StoreError::Status { status, message: error_message(body) },
    }
}
