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

//! The one-line status bar.
//!
//! Shows the unread total, the active notifications filter, background sync
//! activity, and the most recent background error. Everything it shows is
//! assembled purely from bus events; muted conversations are excluded from
//! the unread total, matching what a badge would count.

mod render;

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    events::{Event, EventKind, EventManager, Subscription},
    model::{NotificationsFilter, SyncState},
};

pub(crate) struct StatusBarState {
    pub(crate) unread_total: i64,
    pub(crate) filter: NotificationsFilter,
    pub(crate) sync_state: SyncState,
    pub(crate) last_error: Option<String>,

    subscriptions: Vec<Subscription>,
}

#[derive(Clone)]
pub(crate) struct StatusBarView {
    state: Rc<RefCell<StatusBarState>>,
}

impl StatusBarView {
    pub(crate) fn new(filter: NotificationsFilter) -> Self {
        Self {
            state: Rc::new(RefCell::new(StatusBarState {
                unread_total: 0,
                filter,
                sync_state: SyncState::Idle,
                last_error: None,
                subscriptions: vec![],
            })),
        }
    }

    /// Registers the bar for everything it renders. Like the inbox it stays
    /// mounted for the lifetime of the application.
    pub(crate) fn mount(&self, bus: &EventManager) {
        let mut state = self.state.borrow_mut();

        let bar = Rc::clone(&self.state);
        state.subscriptions.push(bus.add_listener(
            EventKind::ConversationsUpdated,
            move |event| {
                if let Event::ConversationsUpdated(conversations) = event {
                    let mut state = bar.borrow_mut();
                    state.unread_total = conversations
                        .iter()
                        .filter(|conversation| !conversation.muted)
                        .map(|conversation| conversation.unread)
                        .sum();
                    // A successful refresh supersedes whatever failed before.
                    state.last_error = None;
                }
                Ok(())
            },
        ));

        let bar = Rc::clone(&self.state);
        state
            .subscriptions
            .push(bus.add_listener(EventKind::MessageArrived, move |event| {
                if let Event::MessageArrived { muted, .. } = event {
                    if !muted {
                        bar.borrow_mut().unread_total += 1;
                    }
                }
                Ok(())
            }));

        let bar = Rc::clone(&self.state);
        state.subscriptions.push(bus.add_listener(
            EventKind::NotificationsFilterChanged,
            move |event| {
                if let Event::NotificationsFilterChanged(filter) = event {
                    bar.borrow_mut().filter = *filter;
                }
                Ok(())
            },
        ));

        let bar = Rc::clone(&self.state);
        state
            .subscriptions
            .push(bus.add_listener(EventKind::SyncStateChanged, move |event| {
                if let Event::SyncStateChanged(sync_state) = event {
                    bar.borrow_mut().sync_state = *sync_state;
                }
                Ok(())
            }));

        let bar = Rc::clone(&self.state);
        state
            .subscriptions
            .push(bus.add_listener(EventKind::Error, move |event| {
                if let Event::Error(message) = event {
                    bar.borrow_mut().last_error = Some(message.clone());
                }
                Ok(())
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{ConversationSummary, Message};

    fn summary(id: i64, unread: i64, muted: bool) -> ConversationSummary {
        ConversationSummary {
            id,
            name: format!("conversation {id}"),
            last_sender: "someone".to_string(),
            last_message: "hello".to_string(),
            last_activity: 100,
            unread,
            muted,
        }
    }

    fn arrival(muted: bool) -> Event {
        Event::MessageArrived {
            message: Message {
                id: 1,
                conversation_id: 1,
                sender: "someone".to_string(),
                body: "hi".to_string(),
                sent_at: 200,
            },
            muted,
        }
    }

    #[test]
    fn unread_total_skips_muted_conversations() {
        let bus = EventManager::new();
        let bar = StatusBarView::new(NotificationsFilter::Everything);
        bar.mount(&bus);

        bus.dispatch(Event::ConversationsUpdated(vec![
            summary(1, 3, false),
            summary(2, 5, true),
            summary(3, 1, false),
        ]));

        assert_eq!(bar.state.borrow().unread_total, 4);
    }

    #[test]
    fn arrivals_bump_the_total_unless_muted() {
        let bus = EventManager::new();
        let bar = StatusBarView::new(NotificationsFilter::Everything);
        bar.mount(&bus);

        bus.dispatch(arrival(false));
        bus.dispatch(arrival(true));

        assert_eq!(bar.state.borrow().unread_total, 1);
    }

    #[test]
    fn refresh_clears_a_stale_error() {
        let bus = EventManager::new();
        let bar = StatusBarView::new(NotificationsFilter::Everything);
        bar.mount(&bus);

        bus.dispatch(Event::Error("store unavailable".to_string()));
        assert!(bar.state.borrow().last_error.is_some());

        bus.dispatch(Event::ConversationsUpdated(vec![]));
        assert!(bar.state.borrow().last_error.is_none());
    }
}
