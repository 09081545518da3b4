//! Account operations the pages run against the platform services.
//!
//! Each operation validates its input before touching a service, so a
//! rejected form never produces a backend call.

#[cfg(test)]
#[path = "account_test.rs"]
mod account_test;

use platform::{BlobStore, DocumentStore, StoreError};
use session::{AuthError, Identity, IdentityProvider, SessionContext};
use time::OffsetDateTime;

use crate::state::profile::{PendingImage, Profile, ProfileForm, SignupForm, USERS_COLLECTION, ValidationError};

/// Folder holding one avatar object per user id.
const PROFILE_IMAGES: &str = "profileImages";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub fn profile_image_path(uid: &str) -> String {
    format!("{PROFILE_IMAGES}/{uid}")
}

/// Sign in with email and password. Unverified accounts are signed straight
/// back out and rejected.
pub async fn sign_in(identity: &dyn IdentityProvider, email: &str, password: &str) -> Result<Identity, AccountError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }
    let user = identity.sign_in(email, password).await?;
    if !user.email_verified {
        log::info!("account: {} signed in before verifying email", user.id);
        if let Err(e) = identity.sign_out().await {
            log::warn!("account: sign-out of unverified user failed: {e}");
        }
        return Err(AuthError::EmailNotVerified.into());
    }
    Ok(user)
}

/// Register a new account, request the verification email, and write the
/// initial profile document.
pub async fn create_account(
    identity: &dyn IdentityProvider,
    documents: &dyn DocumentStore,
    form: &SignupForm,
    now: OffsetDateTime,
) -> Result<Identity, AccountError> {
    form.validate()?;
    let user = identity.sign_up(form.email.trim(), &form.password).await?;
    identity.send_verification(&user).await?;
    documents.set(USERS_COLLECTION, &user.id, form.to_document(now)).await?;
    log::info!("account: created profile for {}", user.id);
    Ok(user)
}

pub async fn load_profile(documents: &dyn DocumentStore, uid: &str) -> Result<Option<Profile>, AccountError> {
    let doc = documents.get(USERS_COLLECTION, uid).await?;
    Ok(doc.as_ref().map(Profile::from_document))
}

pub async fn save_profile(documents: &dyn DocumentStore, uid: &str, form: &ProfileForm) -> Result<(), AccountError> {
    form.validate()?;
    documents.update(USERS_COLLECTION, uid, form.to_document()).await?;
    Ok(())
}

/// Upload `image` as the user's avatar and point the profile at it.
/// Returns the public URL now stored in `profileImage`.
pub async fn upload_profile_image(
    blobs: &dyn BlobStore,
    documents: &dyn DocumentStore,
    uid: &str,
    image: PendingImage,
) -> Result<String, AccountError> {
    let path = profile_image_path(uid);
    blobs.upload(&path, image.bytes, &image.content_type).await?;
    let url = blobs.public_url(&path).await?;

    let mut partial = platform::Document::new();
    partial.insert("profileImage".to_owned(), url.as_str().into());
    documents.update(USERS_COLLECTION, uid, partial).await?;
    Ok(url)
}

pub async fn sign_out(session: &SessionContext) -> Result<(), AccountError> {
    session.sign_out().await?;
    Ok(())
}
