//! In-memory implementations of the platform services.
//!
//! Used by tests as fakes and handy for running the UI without a hosted
//! project. Every operation is recorded so callers can assert which backend
//! calls were (or were not) made.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use async_trait::async_trait;
use session::{AuthError, Identity, IdentityChannel, IdentityListener, IdentityProvider, Subscription};

use crate::document::{Document, merge};
use crate::error::StoreError;
use crate::store::{BlobStore, DocumentStore};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    identity: Identity,
    password: String,
}

/// Identity provider backed by a local account table.
///
/// Like the hosted provider, nothing is published until [`Self::restore`]
/// runs; after that, sign-in/sign-up/sign-out publish immediately.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    channel: IdentityChannel,
    accounts: RefCell<BTreeMap<String, Account>>,
    current: RefCell<Option<Identity>>,
    next_id: Cell<u64>,
    verification_requests: RefCell<Vec<String>>,
    sign_out_failure: RefCell<Option<AuthError>>,
    sign_out_calls: Cell<usize>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account directly, bypassing sign-up.
    pub fn add_account(&self, email: &str, password: &str, email_verified: bool) -> Identity {
        let identity = Identity::new(self.allocate_id(), email, email_verified);
        self.accounts
            .borrow_mut()
            .insert(email.to_owned(), Account { identity: identity.clone(), password: password.to_owned() });
        identity
    }

    /// Treat `email` as the user restored from a previous visit.
    pub fn set_signed_in(&self, email: &str) {
        let identity = self.accounts.borrow().get(email).map(|a| a.identity.clone());
        *self.current.borrow_mut() = identity;
    }

    /// Deliver the initial notification (restored user or signed out).
    pub fn restore(&self) {
        let current = self.current.borrow().clone();
        self.channel.publish(current);
    }

    /// Flip the verified flag, as if the user clicked the emailed link.
    pub fn mark_verified(&self, email: &str) {
        if let Some(account) = self.accounts.borrow_mut().get_mut(email) {
            account.identity.email_verified = true;
        }
    }

    /// Make the next sign-out calls fail with `err`.
    pub fn fail_sign_out(&self, err: AuthError) {
        *self.sign_out_failure.borrow_mut() = Some(err);
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Ids the provider was asked to send verification emails to.
    #[must_use]
    pub fn verification_requests(&self) -> Vec<String> {
        self.verification_requests.borrow().clone()
    }

    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.get()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.channel.listener_count()
    }

    fn allocate_id(&self) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("user-{id}")
    }

    fn enter(&self, identity: Identity) -> Identity {
        *self.current.borrow_mut() = Some(identity.clone());
        self.channel.publish(Some(identity.clone()));
        identity
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = {
            let accounts = self.accounts.borrow();
            match accounts.get(email) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(AuthError::InvalidCredential),
            }
        };
        Ok(self.enter(identity))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if !email.contains('@') {
            return Err(AuthError::Provider("The email address is badly formatted.".to_owned()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.accounts.borrow().contains_key(email) {
            return Err(AuthError::EmailInUse);
        }
        let identity = self.add_account(email, password, false);
        Ok(self.enter(identity))
    }

    async fn send_verification(&self, identity: &Identity) -> Result<(), AuthError> {
        let known = self.accounts.borrow().values().any(|a| a.identity.id == identity.id);
        if !known {
            return Err(AuthError::Provider("There is no user record corresponding to this identifier.".to_owned()));
        }
        self.verification_requests.borrow_mut().push(identity.id.clone());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        if let Some(err) = self.sign_out_failure.borrow().clone() {
            return Err(err);
        }
        self.current.borrow_mut().take();
        self.channel.publish(None);
        Ok(())
    }

    fn subscribe(&self, on_change: IdentityListener) -> Subscription {
        self.channel.subscribe(on_change)
    }
}

/// Document store holding everything in a map keyed by `collection/id`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: RefCell<BTreeMap<String, Document>>,
    calls: RefCell<Vec<String>>,
    write_failure: RefCell<Option<StoreError>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without recording a call.
    pub fn insert(&self, collection: &str, id: &str, doc: Document) {
        self.docs.borrow_mut().insert(doc_path(collection, id), doc);
    }

    #[must_use]
    pub fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.docs.borrow().get(&doc_path(collection, id)).cloned()
    }

    /// Recorded calls, e.g. `"update users/u1"`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Make every subsequent `set`/`update` fail with `err`.
    pub fn fail_writes(&self, err: StoreError) {
        *self.write_failure.borrow_mut() = Some(err);
    }

    fn record(&self, op: &str, path: &str) {
        self.calls.borrow_mut().push(format!("{op} {path}"));
    }

    fn check_write(&self) -> Result<(), StoreError> {
        match self.write_failure.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let path = doc_path(collection, id);
        self.record("get", &path);
        Ok(self.docs.borrow().get(&path).cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let path = doc_path(collection, id);
        self.record("set", &path);
        self.check_write()?;
        self.docs.borrow_mut().insert(path, doc);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<(), StoreError> {
        let path = doc_path(collection, id);
        self.record("update", &path);
        self.check_write()?;
        let mut docs = self.docs.borrow_mut();
        let Some(existing) = docs.get_mut(&path) else {
            return Err(StoreError::NotFound { path });
        };
        merge(existing, &partial);
        Ok(())
    }
}

/// A stored blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store serving objects from `{base_url}/{path}`.
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: RefCell<BTreeMap<String, StoredBlob>>,
    calls: RefCell<Vec<String>>,
    upload_failure: RefCell<Option<StoreError>>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            objects: RefCell::default(),
            calls: RefCell::default(),
            upload_failure: RefCell::default(),
        }
    }

    #[must_use]
    pub fn object(&self, path: &str) -> Option<StoredBlob> {
        self.objects.borrow().get(path).cloned()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn fail_uploads(&self, err: StoreError) {
        *self.upload_failure.borrow_mut() = Some(err);
    }
}

#[async_trait(?Send)]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        self.calls.borrow_mut().push(format!("upload {path}"));
        if let Some(err) = self.upload_failure.borrow().clone() {
            return Err(err);
        }
        self.objects
            .borrow_mut()
            .insert(path.to_owned(), StoredBlob { content_type: content_type.to_owned(), bytes });
        Ok(())
    }

    async fn public_url(&self, path: &str) -> Result<String, StoreError> {
        self.calls.borrow_mut().push(format!("public_url {path}"));
        if !self.objects.borrow().contains_key(path) {
            return Err(StoreError::NotFound { path: path.to_owned() });
        }
        Ok(format!("{}/{path}", self.base_url))
    }
}

fn doc_path(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}
