//! Service calls made by pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! `account` sequences the platform services (identity, documents, blobs)
//! behind the operations each screen performs.

pub mod account;
