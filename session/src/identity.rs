//! Signed-in identity as delivered by the identity provider.

use serde::{Deserialize, Serialize};

/// Opaque handle for an authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Provider-assigned unique user id; keys the user's profile document.
    pub id: String,
    pub email: String,
    /// Whether the user has confirmed their email address.
    pub email_verified: bool,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, email_verified: bool) -> Self {
        Self { id: id.into(), email: email.into(), email_verified }
    }
}
