//! Backend-as-a-service collaborators for the customer portal.
//!
//! The portal has no server of its own: authentication, profile documents,
//! and profile images all live on a hosted platform. This crate defines the
//! consumed contracts ([`DocumentStore`], [`BlobStore`], and the
//! [`session::IdentityProvider`] implementations), the hosted REST client in
//! [`hosted`], and in-memory stand-ins in [`memory`].

pub mod config;
pub mod credentials;
pub mod document;
pub mod error;
pub mod hosted;
pub mod memory;
pub mod store;

pub use config::{ConfigError, Endpoints, PlatformConfig};
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use document::{Document, Value};
pub use error::StoreError;
pub use hosted::HostedPlatform;
pub use store::{BlobStore, DocumentStore};
