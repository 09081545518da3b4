use std::cell::RefCell;
use std::time::Duration;

use httpmock::prelude::*;

use super::*;
use crate::config::PlatformConfig;
use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::hosted::HostedPlatform;

fn config() -> PlatformConfig {
    PlatformConfig::from_json(r#"{"apiKey":"key 1","projectId":"portal-dev","storageBucket":"portal-dev.appspot.com"}"#)
        .expect("config")
}

// =============================================================
// Error-code mapping
// =============================================================

#[test]
fn maps_known_codes() {
    assert_eq!(auth_error_from_code("EMAIL_EXISTS"), AuthError::EmailInUse);
    assert_eq!(auth_error_from_code("INVALID_LOGIN_CREDENTIALS"), AuthError::InvalidCredential);
    assert_eq!(auth_error_from_code("EMAIL_NOT_FOUND"), AuthError::InvalidCredential);
    assert_eq!(auth_error_from_code("INVALID_PASSWORD"), AuthError::InvalidCredential);
}

#[test]
fn weak_password_keeps_service_detail() {
    assert_eq!(
        auth_error_from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
        AuthError::WeakPassword("Password should be at least 6 characters".to_owned())
    );
    assert_eq!(
        auth_error_from_code("WEAK_PASSWORD"),
        AuthError::WeakPassword(DEFAULT_WEAK_PASSWORD_DETAIL.to_owned())
    );
}

#[test]
fn unknown_code_is_passed_through() {
    assert_eq!(
        auth_error_from_code("OPERATION_NOT_ALLOWED"),
        AuthError::Provider("OPERATION_NOT_ALLOWED".to_owned())
    );
}

// =============================================================
// URLs and payloads
// =============================================================

#[test]
fn accounts_url_encodes_key() {
    let cfg = config();
    assert_eq!(
        accounts_url(&cfg.endpoints, &cfg.api_key, "signUp"),
        "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=key%201"
    );
    assert_eq!(token_url(&cfg.endpoints, &cfg.api_key), "https://securetoken.googleapis.com/v1/token?key=key%201");
}

#[test]
fn password_response_parses_camel_case() {
    let raw = r#"{
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": "u1",
        "email": "a@b.com",
        "idToken": "id-token",
        "refreshToken": "refresh-token",
        "expiresIn": "3600",
        "registered": true
    }"#;
    let parsed: PasswordAuthResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.local_id, "u1");
    assert_eq!(parsed.refresh_token, "refresh-token");
    assert_eq!(parsed.expires_in, "3600");
}

#[test]
fn lookup_response_reads_verified_flag() {
    let raw = r#"{"users":[{"localId":"u1","email":"a@b.com","emailVerified":true}]}"#;
    let parsed: LookupResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.users.len(), 1);
    assert!(parsed.users[0].email_verified);
}

// =============================================================
// Local-only flows (no network)
// =============================================================

#[tokio::test]
async fn restore_without_stored_token_publishes_signed_out() {
    let platform = HostedPlatform::new(config(), Rc::new(MemoryCredentialStore::default()));
    let identity = platform.identity();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = identity.subscribe(Box::new(move |id: Option<Identity>| sink.borrow_mut().push(id)));

    assert!(seen.borrow().is_empty());
    identity.restore().await;
    assert_eq!(*seen.borrow(), vec![None]);
}

#[tokio::test]
async fn sign_out_clears_persisted_token_and_publishes() {
    let store = Rc::new(MemoryCredentialStore::with_token("refresh-token"));
    let platform = HostedPlatform::new(config(), store.clone());
    let identity = platform.identity();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = identity.subscribe(Box::new(move |id: Option<Identity>| sink.borrow_mut().push(id)));

    identity.sign_out().await.unwrap();
    assert_eq!(store.load(), None);
    assert_eq!(*seen.borrow(), vec![None]);
}

#[tokio::test]
async fn send_verification_requires_matching_session() {
    let platform = HostedPlatform::new(config(), Rc::new(MemoryCredentialStore::default()));
    let err = platform
        .identity()
        .send_verification(&Identity::new("u1", "a@b.com", false))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Provider("no active session for this user".to_owned()));
}

// =============================================================
// Session restore against a stub server
// =============================================================

/// Config whose identity and token endpoints point at `server`.
fn stub_config(server: &MockServer) -> PlatformConfig {
    let mut cfg = config();
    cfg.endpoints.identity = server.base_url();
    cfg.endpoints.token = server.base_url();
    cfg
}

async fn stub_session(server: &MockServer, token_delay: Duration) {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/token");
            then.status(200).delay(token_delay).json_body(serde_json::json!({
                "id_token": "id-2",
                "refresh_token": "r2",
                "user_id": "u1",
                "expires_in": "3600"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/accounts:lookup");
            then.status(200).json_body(serde_json::json!({
                "users": [{ "localId": "u1", "email": "a@b.com", "emailVerified": true }]
            }));
        })
        .await;
}

#[tokio::test]
async fn restore_resumes_stored_session() {
    let server = MockServer::start_async().await;
    stub_session(&server, Duration::ZERO).await;
    let store = Rc::new(MemoryCredentialStore::with_token("r1"));
    let platform = HostedPlatform::new(stub_config(&server), store.clone());
    let identity = platform.identity();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = identity.subscribe(Box::new(move |id: Option<Identity>| sink.borrow_mut().push(id)));

    identity.restore().await;

    assert_eq!(*seen.borrow(), vec![Some(Identity::new("u1", "a@b.com", true))]);
    assert_eq!(store.load(), Some("r2".to_owned()));
}

#[tokio::test]
async fn sign_out_during_slow_restore_stays_signed_out() {
    let server = MockServer::start_async().await;
    stub_session(&server, Duration::from_millis(300)).await;
    let store = Rc::new(MemoryCredentialStore::with_token("r1"));
    let platform = HostedPlatform::new(stub_config(&server), store.clone());
    let identity = platform.identity();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = identity.subscribe(Box::new(move |id: Option<Identity>| sink.borrow_mut().push(id)));

    let sign_out = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        identity.sign_out().await.unwrap();
    };
    tokio::join!(identity.restore(), sign_out);

    assert_eq!(*seen.borrow(), vec![None]);
    assert_eq!(store.load(), None);
    assert!(platform.identity().shared.current().is_none());
}
