//! Hosted email/password identity provider.
//!
//! Wraps the `accounts:*` REST methods and the refresh-token grant. Identity
//! changes are announced on an [`IdentityChannel`]; nothing is published
//! until [`HostedIdentity::restore`] has decided whether a persisted session
//! can be resumed.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use session::{AuthError, Identity, IdentityChannel, IdentityListener, IdentityProvider, Subscription};
use time::OffsetDateTime;

use super::{Credentials, Shared, TokenGrant, error_message, expiry_from};
use crate::config::Endpoints;

const DEFAULT_WEAK_PASSWORD_DETAIL: &str = "Password should be at least 6 characters";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: String,
}

#[derive(Debug, Default, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

/// Identity provider backed by the hosted auth REST API.
pub struct HostedIdentity {
    shared: Rc<Shared>,
    channel: IdentityChannel,
}

impl HostedIdentity {
    pub(crate) fn new(shared: Rc<Shared>) -> Self {
        Self { shared, channel: IdentityChannel::new() }
    }

    /// Resume the persisted session, if any, then publish the initial state.
    ///
    /// Any failure degrades to "signed out"; the stored token is kept so a
    /// transient outage does not log the user out permanently.
    pub async fn restore(&self) {
        let Some(refresh_token) = self.shared.stored_refresh_token() else {
            log::debug!("hosted identity: no stored session");
            self.channel.publish(None);
            return;
        };
        let epoch = self.shared.epoch();
        match self.resume(epoch, &refresh_token).await {
            Ok(Some(identity)) => {
                log::info!("hosted identity: restored session for {}", identity.id);
                self.channel.publish(Some(identity));
            }
            Ok(None) => {
                log::debug!("hosted identity: restore superseded by a sign-in or sign-out");
            }
            Err(err) if self.shared.epoch() != epoch => {
                log::debug!("hosted identity: restore superseded, ignoring failure: {err}");
            }
            Err(err) => {
                log::warn!("hosted identity: session restore failed: {err}");
                self.channel.publish(None);
            }
        }
    }

    /// `Ok(None)` when the session changed while the calls were in flight.
    async fn resume(&self, epoch: u64, refresh_token: &str) -> Result<Option<Identity>, AuthError> {
        let grant = exchange_refresh_token(&self.shared, refresh_token).await?;
        let identity = self.lookup(&grant.id_token).await?;
        let adopted = self.shared.install_if_current(
            epoch,
            Credentials {
                identity: identity.clone(),
                id_token: grant.id_token,
                refresh_token: grant.refresh_token,
                expires_at: expiry_from(&grant.expires_in, OffsetDateTime::now_utc()),
            },
        );
        Ok(adopted.then_some(identity))
    }

    async fn lookup(&self, id_token: &str) -> Result<Identity, AuthError> {
        let url = accounts_url(&self.shared.config.endpoints, &self.shared.config.api_key, "lookup");
        let body = serde_json::json!({ "idToken": id_token });
        let response: LookupResponse = post_json(&self.shared, &url, &body).await?;
        let user = response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::Provider("account lookup returned no user".to_owned()))?;
        Ok(Identity::new(user.local_id, user.email, user.email_verified))
    }

    /// Install credentials from a password sign-in/up and announce the user.
    fn enter(&self, response: PasswordAuthResponse, email_verified: bool) -> Identity {
        let identity = Identity::new(response.local_id, response.email, email_verified);
        self.shared.install(Credentials {
            identity: identity.clone(),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: expiry_from(&response.expires_in, OffsetDateTime::now_utc()),
        });
        self.channel.publish(Some(identity.clone()));
        identity
    }

    /// Fresh id token for `identity`, if it is the signed-in user.
    async fn token_for(&self, identity: &Identity) -> Result<String, AuthError> {
        let signed_in = self.shared.current().is_some_and(|c| c.identity.id == identity.id);
        if !signed_in {
            return Err(AuthError::Provider("no active session for this user".to_owned()));
        }
        self.shared
            .bearer()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?
            .ok_or_else(|| AuthError::Provider("no active session for this user".to_owned()))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for HostedIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = accounts_url(&self.shared.config.endpoints, &self.shared.config.api_key, "signInWithPassword");
        let body = serde_json::json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: PasswordAuthResponse = post_json(&self.shared, &url, &body).await?;
        let verified = self.lookup(&response.id_token).await?.email_verified;
        Ok(self.enter(response, verified))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = accounts_url(&self.shared.config.endpoints, &self.shared.config.api_key, "signUp");
        let body = serde_json::json!({ "email": email, "password": password, "returnSecureToken": true });
        let response: PasswordAuthResponse = post_json(&self.shared, &url, &body).await?;
        Ok(self.enter(response, false))
    }

    async fn send_verification(&self, identity: &Identity) -> Result<(), AuthError> {
        let id_token = self.token_for(identity).await?;
        let url = accounts_url(&self.shared.config.endpoints, &self.shared.config.api_key, "sendOobCode");
        let body = serde_json::json!({ "requestType": "VERIFY_EMAIL", "idToken": id_token });
        let _: serde_json::Value = post_json(&self.shared, &url, &body).await?;
        log::info!("hosted identity: verification email requested for {}", identity.id);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.shared.forget();
        self.channel.publish(None);
        Ok(())
    }

    fn subscribe(&self, on_change: IdentityListener) -> Subscription {
        self.channel.subscribe(on_change)
    }
}

/// Trade a refresh token for a new id token.
pub(crate) async fn exchange_refresh_token(shared: &Shared, refresh_token: &str) -> Result<TokenGrant, AuthError> {
    let url = token_url(&shared.config.endpoints, &shared.config.api_key);
    let body = serde_json::json!({ "grant_type": "refresh_token", "refresh_token": refresh_token });
    post_json(shared, &url, &body).await
}

async fn post_json<B: Serialize, R: DeserializeOwned>(shared: &Shared, url: &str, body: &B) -> Result<R, AuthError> {
    let resp = shared
        .http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| AuthError::Provider(e.to_string()))?;
    if !resp.status().is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(auth_error_from_code(&error_message(&body)));
    }
    resp.json::<R>().await.map_err(|e| AuthError::Provider(e.to_string()))
}

fn accounts_url(endpoints: &Endpoints, api_key: &str, method: &str) -> String {
    format!("{}/v1/accounts:{method}?key={}", endpoints.identity, urlencoding::encode(api_key))
}

fn token_url(endpoints: &Endpoints, api_key: &str) -> String {
    format!("{}/v1/token?key={}", endpoints.token, urlencoding::encode(api_key))
}

/// Translate a service error code (e.g. `EMAIL_EXISTS`,
/// `WEAK_PASSWORD : Password should be at least 6 characters`).
fn auth_error_from_code(code: &str) -> AuthError {
    let (head, detail) = match code.split_once(':') {
        Some((head, detail)) => (head.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };
    match head {
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredential,
        "WEAK_PASSWORD" => {
            AuthError::WeakPassword(detail.unwrap_or(DEFAULT_WEAK_PASSWORD_DETAIL).to_owned())
        }
        "INVALID_EMAIL" => AuthError::Provider("The email address is badly formatted.".to_owned()),
        "MISSING_PASSWORD" => AuthError::Provider("A password is required.".to_owned()),
        "USER_DISABLED" => AuthError::Provider("This account has been disabled.".to_owned()),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AuthError::Provider("Too many attempts. Please try again later.".to_owned())
        }
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            AuthError::Provider("Your session has expired. Please sign in again.".to_owned())
        }
        _ => AuthError::Provider(code.trim().to_owned()),
    }
}
