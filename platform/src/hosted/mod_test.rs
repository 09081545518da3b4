use super::*;

#[test]
fn error_message_prefers_envelope_message() {
    let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
    assert_eq!(error_message(body), "EMAIL_EXISTS");
}

#[test]
fn error_message_falls_back_to_body() {
    assert_eq!(error_message("  bad gateway \n"), "bad gateway");
    assert_eq!(error_message(""), "empty response");
}

#[test]
fn status_error_maps_common_codes() {
    assert_eq!(status_error(401, "", "users/u1"), StoreError::Unauthenticated);
    assert_eq!(
        status_error(403, r#"{"error":{"message":"Missing or insufficient permissions."}}"#, "users/u1"),
        StoreError::PermissionDenied("Missing or insufficient permissions.".to_owned())
    );
    assert_eq!(status_error(404, "", "users/u1"), StoreError::NotFound { path: "users/u1".to_owned() });
    assert_eq!(
        status_error(500, "boom", "users/u1"),
        StoreError::Status { status: 500, message: "boom".to_owned() }
    );
}

#[test]
fn expiry_from_parses_seconds_with_default() {
    let now = OffsetDateTime::UNIX_EPOCH;
    assert_eq!(expiry_from("120", now), now + Duration::seconds(120));
    assert_eq!(expiry_from("soon", now), now + Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
}

#[test]
fn credentials_expire_soon_inside_margin() {
    let now = OffsetDateTime::UNIX_EPOCH;
    let mut creds = Credentials {
        identity: Identity::new("u1", "a@b.com", true),
        id_token: "id".to_owned(),
        refresh_token: "refresh".to_owned(),
        expires_at: now + Duration::seconds(3600),
    };
    assert!(!creds.expires_soon(now));
    creds.expires_at = now + Duration::seconds(30);
    assert!(creds.expires_soon(now));
}
