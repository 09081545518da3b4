//! Document and blob storage contracts.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::StoreError;

/// Keyed document persistence (`collection/id`).
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Fetch a document; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport, permission, or decode failures.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Replace the whole document, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write is rejected.
    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// Merge `partial` into an existing document. Fields not present in
    /// `partial` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist, or
    /// another [`StoreError`] if the write is rejected. A failed update must
    /// not be assumed partially applied.
    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<(), StoreError>;
}

/// Binary object storage with retrievable public URLs.
#[async_trait(?Send)]
pub trait BlobStore {
    /// Store `bytes` at `path`, replacing any existing object.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the upload is rejected.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError>;

    /// Public download URL for the object at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing object.
    async fn public_url(&self, path: &str) -> Result<String, StoreError>;
}
