//! Push channel for identity-change notifications.
//!
//! Providers own one [`IdentityChannel`] and call [`IdentityChannel::publish`]
//! whenever the signed-in identity changes. Consumers register through
//! [`IdentityChannel::subscribe`] and hold the returned [`Subscription`] for as
//! long as they want notifications.
//!
//! INVARIANTS
//! ==========
//! 1. At most one notification is dispatched at a time. A publish issued from
//!    inside a listener is queued and delivered after the current one.
//! 2. Every listener receives exactly one initial notification: the first
//!    publish, or the resolved state when it subscribes after resolution.
//! 3. A released subscription is never invoked again, even if it was part of
//!    a dispatch already in progress.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::identity::Identity;

type Callback = Rc<dyn Fn(Option<Identity>)>;
type Dispatch = Vec<(Rc<Cell<bool>>, Callback, Option<Identity>)>;

struct Listener {
    id: u64,
    active: Rc<Cell<bool>>,
    primed: bool,
    callback: Callback,
}

enum Delivery {
    Broadcast(Option<Identity>),
    /// Initial notification for a listener that joined after resolution.
    Prime(u64),
}

#[derive(Default)]
struct ChannelState {
    next_id: u64,
    listeners: Vec<Listener>,
    /// `None` until the first publish; then the latest published identity.
    resolved: Option<Option<Identity>>,
    queue: VecDeque<Delivery>,
    dispatching: bool,
}

impl ChannelState {
    fn prepare(&mut self, delivery: Delivery) -> Dispatch {
        match delivery {
            Delivery::Broadcast(identity) => {
                self.resolved = Some(identity.clone());
                self.listeners
                    .iter_mut()
                    .map(|listener| {
                        listener.primed = true;
                        (listener.active.clone(), listener.callback.clone(), identity.clone())
                    })
                    .collect()
            }
            Delivery::Prime(id) => {
                let identity = self.resolved.clone().flatten();
                self.listeners
                    .iter_mut()
                    .filter(|listener| listener.id == id && !listener.primed)
                    .map(|listener| {
                        listener.primed = true;
                        (listener.active.clone(), listener.callback.clone(), identity.clone())
                    })
                    .collect()
            }
        }
    }
}

/// Single-threaded, ordered fan-out of identity changes.
#[derive(Clone, Default)]
pub struct IdentityChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl IdentityChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `on_change`. If the channel already resolved, the current
    /// identity is delivered before this call returns.
    pub fn subscribe(&self, on_change: impl Fn(Option<Identity>) + 'static) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push(Listener {
                id,
                active: active.clone(),
                primed: false,
                callback: Rc::new(on_change),
            });
            if state.resolved.is_some() {
                state.queue.push_back(Delivery::Prime(id));
            }
            id
        };

        let weak = Rc::downgrade(&self.state);
        let subscription = Subscription::new(active, move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|listener| listener.id != id);
            }
        });
        self.drain();
        subscription
    }

    /// Announce a new identity (or sign-out) to every live listener.
    pub fn publish(&self, identity: Option<Identity>) {
        log::debug!("identity channel: publish signed_in={}", identity.is_some());
        self.state.borrow_mut().queue.push_back(Delivery::Broadcast(identity));
        self.drain();
    }

    /// Latest published identity, or `None` if nothing was published yet.
    #[must_use]
    pub fn resolved(&self) -> Option<Option<Identity>> {
        self.state.borrow().resolved.clone()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn drain(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                return;
            }
            state.dispatching = true;
        }
        loop {
            let dispatch = {
                let mut state = self.state.borrow_mut();
                let Some(delivery) = state.queue.pop_front() else {
                    state.dispatching = false;
                    return;
                };
                state.prepare(delivery)
            };
            // No borrow is held here: listeners may publish, subscribe, or release.
            for (active, callback, identity) in dispatch {
                if active.get() {
                    (callback.as_ref())(identity);
                }
            }
        }
    }
}

impl fmt::Debug for IdentityChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("IdentityChannel")
            .field("listeners", &state.listeners.len())
            .field("resolved", &state.resolved)
            .finish_non_exhaustive()
    }
}

/// RAII handle for a registered listener. Dropping it (or calling
/// [`Subscription::release`]) unsubscribes.
pub struct Subscription {
    active: Rc<Cell<bool>>,
    on_release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Build a handle around a shared `active` flag and a release hook.
    /// Providers that do not use [`IdentityChannel`] can construct their own.
    pub fn new(active: Rc<Cell<bool>>, on_release: impl FnOnce() + 'static) -> Self {
        Self { active, on_release: Some(Box::new(on_release)) }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Unsubscribe now.
    pub fn release(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.active.set(false);
        if let Some(on_release) = self.on_release.take() {
            on_release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.active.get()).finish()
    }
}
