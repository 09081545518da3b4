use super::*;

fn alice() -> Identity {
    Identity::new("u1", "a@b.com", true)
}

fn recorder() -> (Rc<RefCell<Vec<Option<String>>>>, impl Fn(Option<Identity>) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |identity: Option<Identity>| sink.borrow_mut().push(identity.map(|i| i.id)))
}

#[test]
fn unresolved_channel_delivers_nothing_on_subscribe() {
    let channel = IdentityChannel::new();
    let (seen, on_change) = recorder();
    let _sub = channel.subscribe(on_change);
    assert!(seen.borrow().is_empty());
    assert_eq!(channel.resolved(), None);
}

#[test]
fn first_publish_reaches_existing_listener() {
    let channel = IdentityChannel::new();
    let (seen, on_change) = recorder();
    let _sub = channel.subscribe(on_change);
    channel.publish(Some(alice()));
    assert_eq!(*seen.borrow(), vec![Some("u1".to_owned())]);
}

#[test]
fn late_subscriber_receives_resolved_state_once() {
    let channel = IdentityChannel::new();
    channel.publish(None);
    channel.publish(Some(alice()));

    let (seen, on_change) = recorder();
    let _sub = channel.subscribe(on_change);
    assert_eq!(*seen.borrow(), vec![Some("u1".to_owned())]);

    channel.publish(None);
    assert_eq!(*seen.borrow(), vec![Some("u1".to_owned()), None]);
}

#[test]
fn dropped_subscription_stops_notifications() {
    let channel = IdentityChannel::new();
    let (seen, on_change) = recorder();
    let sub = channel.subscribe(on_change);
    channel.publish(None);
    drop(sub);
    channel.publish(Some(alice()));
    assert_eq!(*seen.borrow(), vec![None]);
    assert_eq!(channel.listener_count(), 0);
}

#[test]
fn release_marks_subscription_inactive() {
    let channel = IdentityChannel::new();
    let sub = channel.subscribe(|_| {});
    assert!(sub.is_active());
    assert_eq!(channel.listener_count(), 1);
    sub.release();
    assert_eq!(channel.listener_count(), 0);
}

#[test]
fn publish_from_listener_is_queued_in_order() {
    let channel = IdentityChannel::new();
    let order = Rc::new(RefCell::new(Vec::new()));

    let reentrant = channel.clone();
    let first_order = order.clone();
    let _first = channel.subscribe(move |identity: Option<Identity>| {
        let signed_in = identity.is_some();
        first_order.borrow_mut().push(("first", signed_in));
        if signed_in {
            reentrant.publish(None);
        }
    });
    let second_order = order.clone();
    let _second = channel.subscribe(move |identity: Option<Identity>| {
        second_order.borrow_mut().push(("second", identity.is_some()));
    });

    channel.publish(Some(alice()));

    assert_eq!(
        *order.borrow(),
        vec![("first", true), ("second", true), ("first", false), ("second", false)]
    );
}

#[test]
fn listener_released_mid_dispatch_is_skipped() {
    let channel = IdentityChannel::new();
    let victim_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let slot = victim_slot.clone();
    let _killer = channel.subscribe(move |_| {
        slot.borrow_mut().take();
    });
    let (seen, on_change) = recorder();
    *victim_slot.borrow_mut() = Some(channel.subscribe(on_change));

    channel.publish(Some(alice()));

    assert!(seen.borrow().is_empty());
    assert_eq!(channel.listener_count(), 1);
}

#[test]
fn subscribe_inside_dispatch_gets_single_initial_notification() {
    let channel = IdentityChannel::new();
    let (seen, on_change) = recorder();
    let on_change = Rc::new(on_change);
    let nested: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let inner_channel = channel.clone();
    let inner_slot = nested.clone();
    let _outer = channel.subscribe(move |_| {
        if inner_slot.borrow().is_none() {
            let forward = on_change.clone();
            let sub = inner_channel.subscribe(move |identity| (forward.as_ref())(identity));
            *inner_slot.borrow_mut() = Some(sub);
        }
    });

    channel.publish(Some(alice()));
    assert_eq!(*seen.borrow(), vec![Some("u1".to_owned())]);
}
