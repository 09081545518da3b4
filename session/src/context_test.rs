use std::cell::Cell;

use async_trait::async_trait;

use super::*;
use crate::channel::IdentityChannel;
use crate::provider::IdentityListener;

/// Provider whose notifications are fired by hand.
#[derive(Default)]
struct ScriptedProvider {
    channel: IdentityChannel,
    sign_out_calls: Cell<usize>,
    fail_sign_out: Cell<bool>,
}

impl ScriptedProvider {
    fn notify(&self, identity: Option<Identity>) {
        self.channel.publish(identity);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for ScriptedProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Err(AuthError::InvalidCredential)
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<Identity, AuthError> {
        Err(AuthError::EmailInUse)
    }

    async fn send_verification(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        if self.fail_sign_out.get() {
            return Err(AuthError::Provider("network down".to_owned()));
        }
        Ok(())
    }

    fn subscribe(&self, on_change: IdentityListener) -> Subscription {
        self.channel.subscribe(on_change)
    }
}

fn alice() -> Identity {
    Identity::new("u1", "a@b.com", true)
}

fn bob() -> Identity {
    Identity::new("u2", "bob@example.com", false)
}

fn setup() -> (Rc<ScriptedProvider>, SessionContext) {
    let provider = Rc::new(ScriptedProvider::default());
    let ctx = SessionContext::new(provider.clone());
    (provider, ctx)
}

// =============================================================
// Loading phase
// =============================================================

#[test]
fn fresh_context_is_loading_without_user() {
    let (_provider, ctx) = setup();
    assert!(ctx.is_loading());
    assert_eq!(ctx.current_user(), None);
    assert!(ctx.is_subscribed());
}

#[test]
fn first_notification_settles_loading() {
    let (provider, ctx) = setup();
    provider.notify(Some(alice()));
    assert!(!ctx.is_loading());
    let user = ctx.current_user().expect("user");
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, "a@b.com");
    assert!(user.email_verified);
}

#[test]
fn signed_out_first_notification_also_settles() {
    let (provider, ctx) = setup();
    provider.notify(None);
    assert!(!ctx.is_loading());
    assert_eq!(ctx.current_user(), None);
}

#[test]
fn loading_never_reverts() {
    let (provider, ctx) = setup();
    provider.notify(None);
    provider.notify(Some(alice()));
    provider.notify(None);
    assert!(!ctx.is_loading());
}

#[test]
fn already_resolved_provider_settles_during_construction() {
    let provider = Rc::new(ScriptedProvider::default());
    provider.notify(Some(bob()));
    let ctx = SessionContext::new(provider.clone());
    assert!(!ctx.is_loading());
    assert_eq!(ctx.current_user().map(|u| u.id), Some("u2".to_owned()));
}

// =============================================================
// Notification sequences
// =============================================================

#[test]
fn current_user_tracks_latest_notification() {
    let (provider, ctx) = setup();
    let script = [Some(alice()), None, Some(bob()), Some(alice()), None, None, Some(bob())];
    for identity in script {
        provider.notify(identity.clone());
        assert_eq!(ctx.current_user(), identity);
    }
}

#[test]
fn on_update_sees_each_applied_snapshot() {
    let provider = Rc::new(ScriptedProvider::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _ctx = SessionContext::attach(provider.clone(), move |session| sink.borrow_mut().push(session.clone()));

    provider.notify(Some(alice()));
    provider.notify(None);

    assert_eq!(
        *seen.borrow(),
        vec![
            Session { current_user: Some(alice()), is_loading: false },
            Session { current_user: None, is_loading: false },
        ]
    );
}

// =============================================================
// Sign-out ordering
// =============================================================

#[tokio::test]
async fn sign_out_waits_for_provider_notification() {
    let (provider, ctx) = setup();
    provider.notify(Some(alice()));

    ctx.sign_out().await.expect("sign out");
    assert_eq!(provider.sign_out_calls.get(), 1);
    assert_eq!(ctx.current_user().map(|u| u.id), Some("u1".to_owned()));

    provider.notify(None);
    assert_eq!(ctx.current_user(), None);
}

#[tokio::test]
async fn sign_out_failure_is_returned_and_state_untouched() {
    let (provider, ctx) = setup();
    provider.notify(Some(alice()));
    provider.fail_sign_out.set(true);

    let err = ctx.sign_out().await.expect_err("should fail");
    assert_eq!(err, AuthError::Provider("network down".to_owned()));
    assert_eq!(ctx.snapshot(), Session { current_user: Some(alice()), is_loading: false });
}

// =============================================================
// Teardown
// =============================================================

#[test]
fn teardown_stops_further_updates() {
    let (provider, ctx) = setup();
    provider.notify(Some(alice()));
    ctx.teardown();
    assert!(!ctx.is_subscribed());

    provider.notify(None);
    assert_eq!(ctx.current_user().map(|u| u.id), Some("u1".to_owned()));
    assert_eq!(provider.channel.listener_count(), 0);
}

#[test]
fn teardown_is_idempotent() {
    let (_provider, ctx) = setup();
    ctx.teardown();
    ctx.teardown();
    assert!(!ctx.is_subscribed());
    assert!(ctx.is_loading());
}

#[test]
fn teardown_during_dispatch_drops_in_flight_notification() {
    let provider = Rc::new(ScriptedProvider::default());
    let slot: Rc<RefCell<Option<Rc<SessionContext>>>> = Rc::new(RefCell::new(None));

    // Registered first, so it runs before the session's own listener.
    let killer_slot = slot.clone();
    let _killer = provider.channel.subscribe(move |_| {
        if let Some(ctx) = killer_slot.borrow().as_ref() {
            ctx.teardown();
        }
    });

    let ctx = Rc::new(SessionContext::new(provider.clone()));
    *slot.borrow_mut() = Some(ctx.clone());

    provider.notify(Some(alice()));

    assert!(ctx.is_loading());
    assert_eq!(ctx.current_user(), None);
}

#[test]
fn dropping_context_releases_subscription() {
    let (provider, ctx) = setup();
    assert_eq!(provider.channel.listener_count(), 1);
    drop(ctx);
    assert_eq!(provider.channel.listener_count(), 0);
}
