//! Client-side authentication session for the customer portal.
//!
//! This crate is UI-framework agnostic: it owns the identity model, the
//! identity-provider contract, the push-notification channel providers use to
//! announce sign-in/sign-out, and [`SessionContext`], the single source of
//! truth for "who is signed in and has that answer arrived yet".
//!
//! CONCURRENCY
//! ===========
//! Everything here runs on one cooperative UI thread. Shared state is
//! `Rc`/`RefCell` and provider futures are `?Send`.

pub mod channel;
pub mod context;
pub mod identity;
pub mod provider;

pub use channel::{IdentityChannel, Subscription};
pub use context::{Session, SessionContext};
pub use identity::Identity;
pub use provider::{AuthError, IdentityListener, IdentityProvider};
