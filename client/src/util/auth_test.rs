use session::Identity;

use super::*;

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    let state = SessionState { user: None, loading: false };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = SessionState { user: None, loading: true };
    assert!(!should_redirect_unauth(&state));
    assert!(!should_enter_app(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    let state = SessionState { user: Some(Identity::new("u1", "a@b.com", false)), loading: false };
    assert!(!should_redirect_unauth(&state));
}

#[test]
fn unverified_user_stays_on_login() {
    let state = SessionState { user: Some(Identity::new("u1", "a@b.com", false)), loading: false };
    assert!(!should_enter_app(&state));
}

#[test]
fn verified_user_enters_app() {
    let state = SessionState { user: Some(Identity::new("u1", "a@b.com", true)), loading: false };
    assert!(should_enter_app(&state));
}

#[test]
fn redirects_replace_history_entry() {
    assert!(redirect_options().replace);
    assert!(redirect_options().resolve);
}
