// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The event dispatch manager.
//!
//! [`EventManager`] is the in-process notification hub the rest of the
//! application hangs off: any part of the program can register a callback for
//! an [`EventKind`] and any part can dispatch an [`Event`], without either
//! side knowing about the other. The manager is deliberately single-threaded;
//! background workers hand their events to the main loop over a channel and
//! the loop dispatches from there.
//!
//! Dispatch guarantees, in order of importance:
//!
//! * Listeners for a kind run in registration order, each at most once per
//!   dispatch.
//! * The listener set for a pass is fixed when the pass starts. A listener
//!   registered from inside a callback waits for the next dispatch; a
//!   listener removed from inside a callback is skipped if it has not run
//!   yet.
//! * A failing listener never stops the pass. The error is logged and the
//!   remaining listeners still run.
//! * [`Subscription`] tokens are never reused, so a stale handle kept after
//!   removal can never detach a later registration.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;

use crate::events::{Event, EventKind};

type ListenerCallback = dyn Fn(&Event) -> Result<()>;

/// Opaque handle returned by [`EventManager::add_listener`], needed only to
/// remove the registration again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Subscription {
    kind: EventKind,
    token: u64,
}

struct Listener {
    token: u64,
    callback: Rc<ListenerCallback>,
}

pub(crate) struct EventManager {
    registry: RefCell<HashMap<EventKind, Vec<Listener>>>,
    next_token: Cell<u64>,
}

impl EventManager {
    pub(crate) fn new() -> Self {
        Self {
            registry: RefCell::new(HashMap::new()),
            next_token: Cell::new(1),
        }
    }

    /// Registers `callback` for events of `kind`, behind all listeners
    /// registered for that kind so far.
    pub(crate) fn add_listener(
        &self,
        kind: EventKind,
        callback: impl Fn(&Event) -> Result<()> + 'static,
    ) -> Subscription {
        let token = self.next_token.get();
        self.next_token.set(token + 1);

        self.registry
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Listener {
                token,
                callback: Rc::new(callback),
            });

        tracing::trace!(?kind, token, "listener registered");
        Subscription { kind, token }
    }

    /// Removes the registration identified by `subscription`. Removing a
    /// handle that was already removed, or never existed, is a no-op.
    pub(crate) fn remove_listener(&self, subscription: Subscription) {
        let mut registry = self.registry.borrow_mut();
        if let Some(listeners) = registry.get_mut(&subscription.kind) {
            listeners.retain(|listener| listener.token != subscription.token);
        }
    }

    /// Invokes every listener registered for the kind of `event`, passing
    /// each a shared reference to the event.
    ///
    /// Callbacks are free to call back into the manager: they may register
    /// and remove listeners, and may dispatch further events. A nested
    /// dispatch runs to completion before the outer pass resumes.
    pub(crate) fn dispatch(&self, event: Event) {
        let kind = event.kind();

        // Membership and order for this pass are fixed here. Listeners added
        // by a callback land in the registry but not in this snapshot.
        let snapshot: Vec<(u64, Rc<ListenerCallback>)> = {
            let registry = self.registry.borrow();
            match registry.get(&kind) {
                Some(listeners) => listeners
                    .iter()
                    .map(|listener| (listener.token, Rc::clone(&listener.callback)))
                    .collect(),
                None => return,
            }
        };

        for (token, callback) in snapshot {
            // A callback earlier in this pass may have removed this one.
            if !self.is_registered(kind, token) {
                continue;
            }

            if let Err(error) = callback(&event) {
                tracing::error!(?kind, token, "event listener failed: {error:#}");
            }
        }
    }

    fn is_registered(&self, kind: EventKind, token: u64) -> bool {
        self.registry
            .borrow()
            .get(&kind)
            .is_some_and(|listeners| listeners.iter().any(|listener| listener.token == token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::anyhow;

    use crate::model::NotificationsFilter;

    fn recorder(
        manager: &EventManager,
        kind: EventKind,
        log: &Rc<RefCell<Vec<&'static str>>>,
        label: &'static str,
    ) -> Subscription {
        let log = Rc::clone(log);
        manager.add_listener(kind, move |_| {
            log.borrow_mut().push(label);
            Ok(())
        })
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        recorder(&manager, EventKind::OpenMessagesSettings, &log, "first");
        recorder(&manager, EventKind::OpenMessagesSettings, &log, "second");
        recorder(&manager, EventKind::OpenMessagesSettings, &log, "third");

        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn dispatch_without_listeners_is_a_noop() {
        let manager = EventManager::new();
        manager.dispatch(Event::CloseMessagesSettings);

        // A kind whose last listener was removed behaves the same way.
        let sub = manager.add_listener(EventKind::CloseMessagesSettings, |_| Ok(()));
        manager.remove_listener(sub);
        manager.dispatch(Event::CloseMessagesSettings);
    }

    #[test]
    fn listeners_only_see_their_own_kind() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        recorder(&manager, EventKind::OpenMessagesSettings, &log, "open");
        recorder(&manager, EventKind::CloseMessagesSettings, &log, "close");

        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(*log.borrow(), vec!["open"]);
    }

    #[test]
    fn payload_reaches_every_listener() {
        let manager = EventManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            manager.add_listener(EventKind::NotificationsFilterChanged, move |event| {
                if let Event::NotificationsFilterChanged(filter) = event {
                    seen.borrow_mut().push(*filter);
                }
                Ok(())
            });
        }

        manager.dispatch(Event::NotificationsFilterChanged(
            NotificationsFilter::Unread,
        ));

        assert_eq!(
            *seen.borrow(),
            vec![NotificationsFilter::Unread, NotificationsFilter::Unread]
        );
    }

    #[test]
    fn removed_listener_is_not_invoked() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sub = recorder(&manager, EventKind::OpenMessagesSettings, &log, "hit");

        manager.dispatch(Event::OpenMessagesSettings);
        manager.dispatch(Event::OpenMessagesSettings);
        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(log.borrow().len(), 3);

        manager.remove_listener(sub);

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn remove_is_idempotent() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let sub = recorder(&manager, EventKind::OpenMessagesSettings, &log, "first");
        manager.remove_listener(sub);
        manager.remove_listener(sub);

        recorder(&manager, EventKind::OpenMessagesSettings, &log, "second");
        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(*log.borrow(), vec!["second"]);
    }

    #[test]
    fn stale_handle_never_detaches_a_later_registration() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let stale = recorder(&manager, EventKind::OpenMessagesSettings, &log, "old");
        manager.remove_listener(stale);

        let fresh = recorder(&manager, EventKind::OpenMessagesSettings, &log, "new");
        assert_ne!(stale, fresh);

        // Replaying the dead handle must not touch the new registration.
        manager.remove_listener(stale);
        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(*log.borrow(), vec!["new"]);
    }

    #[test]
    fn failing_listener_does_not_abort_the_pass() {
        let manager = EventManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        {
            let log = Rc::clone(&log);
            manager.add_listener(EventKind::OpenMessagesSettings, move |_| {
                log.borrow_mut().push("failing");
                Err(anyhow!("listener blew up"))
            });
        }
        recorder(&manager, EventKind::OpenMessagesSettings, &log, "after");

        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(*log.borrow(), vec!["failing", "after"]);

        // The failing listener stays registered and fails again next time.
        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["failing", "after", "failing", "after"]);
    }

    #[test]
    fn listener_added_during_dispatch_waits_for_the_next_pass() {
        let manager = Rc::new(EventManager::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        {
            let manager = Rc::clone(&manager);
            let log = Rc::clone(&log);
            manager.clone().add_listener(EventKind::OpenMessagesSettings, move |_| {
                log.borrow_mut().push("outer");
                let log = Rc::clone(&log);
                manager.add_listener(EventKind::OpenMessagesSettings, move |_| {
                    log.borrow_mut().push("inner");
                    Ok(())
                });
                Ok(())
            });
        }

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["outer"]);

        // Second pass picks up one "inner" from the first pass, and the
        // "outer" callback registers another.
        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["outer", "outer", "inner"]);
    }

    #[test]
    fn listener_removed_during_dispatch_is_skipped() {
        let manager = Rc::new(EventManager::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        // The remover runs first and detaches the listener registered
        // behind it, which is then skipped for the rest of the pass.
        let victim_slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));
        {
            let manager = Rc::clone(&manager);
            let log = Rc::clone(&log);
            let slot = Rc::clone(&victim_slot);
            manager.clone().add_listener(EventKind::OpenMessagesSettings, move |_| {
                log.borrow_mut().push("remover");
                if let Some(victim) = slot.get() {
                    manager.remove_listener(victim);
                }
                Ok(())
            });
        }
        let victim = recorder(&manager, EventKind::OpenMessagesSettings, &log, "victim");
        victim_slot.set(Some(victim));

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["remover"]);

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["remover", "remover"]);
    }

    #[test]
    fn listener_may_remove_itself() {
        let manager = Rc::new(EventManager::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let self_slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));
        {
            let manager = Rc::clone(&manager);
            let log = Rc::clone(&log);
            let slot = Rc::clone(&self_slot);
            let sub = manager
                .clone()
                .add_listener(EventKind::OpenMessagesSettings, move |_| {
                    log.borrow_mut().push("once");
                    if let Some(own) = slot.get() {
                        manager.remove_listener(own);
                    }
                    Ok(())
                });
            self_slot.set(Some(sub));
        }
        recorder(&manager, EventKind::OpenMessagesSettings, &log, "steady");

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["once", "steady"]);

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["once", "steady", "steady"]);
    }

    #[test]
    fn reentrant_dispatch_runs_to_completion_first() {
        let manager = Rc::new(EventManager::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        recorder(&manager, EventKind::CloseMessagesSettings, &log, "nested");
        {
            let manager = Rc::clone(&manager);
            let log = Rc::clone(&log);
            manager.clone().add_listener(EventKind::OpenMessagesSettings, move |_| {
                log.borrow_mut().push("outer-before");
                manager.dispatch(Event::CloseMessagesSettings);
                log.borrow_mut().push("outer-after");
                Ok(())
            });
        }
        recorder(&manager, EventKind::OpenMessagesSettings, &log, "outer-second");

        manager.dispatch(Event::OpenMessagesSettings);

        assert_eq!(
            *log.borrow(),
            vec!["outer-before", "nested", "outer-after", "outer-second"]
        );
    }

    #[test]
    fn nested_dispatch_sees_registrations_made_in_the_same_pass() {
        let manager = Rc::new(EventManager::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        // The nested kind has no listeners until the outer callback runs, but
        // the nested dispatch starts after that registration completed.
        {
            let manager = Rc::clone(&manager);
            let log = Rc::clone(&log);
            manager.clone().add_listener(EventKind::OpenMessagesSettings, move |_| {
                let log = Rc::clone(&log);
                manager.add_listener(EventKind::CloseMessagesSettings, move |_| {
                    log.borrow_mut().push("nested");
                    Ok(())
                });
                manager.dispatch(Event::CloseMessagesSettings);
                Ok(())
            });
        }

        manager.dispatch(Event::OpenMessagesSettings);
        assert_eq!(*log.borrow(), vec!["nested"]);
    }

    #[test]
    fn handles_are_distinct_across_kinds_and_registrations() {
        let manager = EventManager::new();

        let a = manager.add_listener(EventKind::OpenMessagesSettings, |_| Ok(()));
        let b = manager.add_listener(EventKind::OpenMessagesSettings, |_| Ok(()));
        let c = manager.add_listener(EventKind::CloseMessagesSettings, |_| Ok(()));

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
