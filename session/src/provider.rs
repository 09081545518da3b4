//! Identity-provider contract consumed by the session and the account flows.
//!
//! DESIGN
//! ======
//! The provider is an external collaborator (hosted auth service, or an
//! in-memory stand-in for tests). Explicit actions return `Result`; identity
//! changes are pushed through [`IdentityProvider::subscribe`] and never
//! returned as a side effect of an action.

use async_trait::async_trait;

use crate::channel::Subscription;
use crate::identity::Identity;

/// Callback invoked with the new identity (or `None` when signed out).
pub type IdentityListener = Box<dyn Fn(Option<Identity>)>;

/// Failure of an explicit authentication action.
///
/// `Display` is the user-facing text shown next to the initiating form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredential,
    #[error("Please verify your email before logging in.")]
    EmailNotVerified,
    #[error("An account with this email already exists.")]
    EmailInUse,
    #[error("Password is too weak: {0}")]
    WeakPassword(String),
    /// Any other provider failure, carrying the provider's own message.
    #[error("{0}")]
    Provider(String),
}

/// Authentication service the portal delegates to.
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Sign in with email + password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredential`] on a bad email/password pair,
    /// or [`AuthError::Provider`] for transport and service failures.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Create an account; the new user is signed in but not yet verified.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailInUse`], [`AuthError::WeakPassword`], or
    /// [`AuthError::Provider`].
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Ask the provider to email a verification link to `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if the request is rejected.
    async fn send_verification(&self, identity: &Identity) -> Result<(), AuthError>;

    /// End the current session. The resulting signed-out state arrives later
    /// through the subscription, not through this return value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`] if the provider fails to sign out.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Register for identity changes. The first notification is delivered
    /// exactly once, as soon as the provider knows the initial state.
    fn subscribe(&self, on_change: IdentityListener) -> Subscription;
}
