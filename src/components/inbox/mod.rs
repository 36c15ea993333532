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

//! The conversation inbox.
//!
//! The inbox shows one row per conversation with its latest message and
//! unread count, filtered by the notifications filter and an optional name
//! search. It never queries the store itself: all of its data arrives over
//! the event bus, and key presses that need store changes go out as tasks.

mod event;
mod render;

use std::cell::RefCell;
use std::rc::Rc;

use ratatui::widgets::TableState;
use tui_input::Input;

use crate::{
    events::{Event, EventKind, EventManager, Subscription},
    model::{ConversationSummary, Message, NotificationsFilter},
};

pub(crate) struct InboxState {
    pub(crate) conversations: Vec<ConversationSummary>,
    pub(crate) filter: NotificationsFilter,
    pub(crate) show_previews: bool,

    pub(crate) search: Input,
    pub(crate) searching: bool,

    pub(crate) table_state: TableState,

    subscriptions: Vec<Subscription>,
}

impl InboxState {
    fn new(filter: NotificationsFilter, show_previews: bool) -> Self {
        Self {
            conversations: vec![],
            filter,
            show_previews,
            search: Input::default(),
            searching: false,
            table_state: TableState::new(),
            subscriptions: vec![],
        }
    }

    /// The conversations the table currently shows, in display order.
    pub(crate) fn visible(&self) -> Vec<&ConversationSummary> {
        let query = self.search.value().trim().to_lowercase();
        self.conversations
            .iter()
            .filter(|conversation| match self.filter {
                NotificationsFilter::Everything => true,
                NotificationsFilter::Unread => conversation.unread > 0,
            })
            .filter(|conversation| {
                query.is_empty() || conversation.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub(crate) fn selected_conversation(&self) -> Option<&ConversationSummary> {
        let index = self.table_state.selected()?;
        self.visible().get(index).copied()
    }

    fn set_conversations(&mut self, conversations: Vec<ConversationSummary>) {
        self.conversations = conversations;
        self.clamp_selection();
    }

    fn set_filter(&mut self, filter: NotificationsFilter) {
        self.filter = filter;
        self.clamp_selection();
    }

    /// Folds one incoming message into the summary list without a store
    /// round trip.
    fn apply_incoming(&mut self, message: &Message, muted: bool) {
        match self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == message.conversation_id)
        {
            Some(conversation) => {
                conversation.last_sender = message.sender.clone();
                conversation.last_message = message.body.clone();
                conversation.last_activity = message.sent_at;
                conversation.unread += 1;
                conversation.muted = muted;
            }
            // First message of a conversation the inbox has never seen; the
            // sender doubles as the conversation name until the next full
            // refresh.
            None => self.conversations.push(ConversationSummary {
                id: message.conversation_id,
                name: message.sender.clone(),
                last_sender: message.sender.clone(),
                last_message: message.body.clone(),
                last_activity: message.sent_at,
                unread: 1,
                muted,
            }),
        }

        self.conversations
            .sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        let selection = match self.table_state.selected() {
            _ if len == 0 => None,
            Some(index) if index < len => Some(index),
            Some(_) => Some(len - 1),
            None => Some(0),
        };
        self.table_state.select(selection);
    }

    fn goto_next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_previous(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn goto_first(&mut self) {
        self.table_state.select_first();
    }

    fn goto_last(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }
}

#[derive(Clone)]
pub(crate) struct InboxView {
    state: Rc<RefCell<InboxState>>,
}

impl InboxView {
    pub(crate) fn new(filter: NotificationsFilter, show_previews: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(InboxState::new(filter, show_previews))),
        }
    }

    pub(crate) fn is_searching(&self) -> bool {
        self.state.borrow().searching
    }

    /// Registers the inbox for everything it renders. The inbox stays
    /// mounted for the lifetime of the application.
    pub(crate) fn mount(&self, bus: &EventManager) {
        let mut state = self.state.borrow_mut();

        let inbox = Rc::clone(&self.state);
        state.subscriptions.push(bus.add_listener(
            EventKind::ConversationsUpdated,
            move |event| {
                if let Event::ConversationsUpdated(conversations) = event {
                    inbox.borrow_mut().set_conversations(conversations.clone());
                }
                Ok(())
            },
        ));

        let inbox = Rc::clone(&self.state);
        state
            .subscriptions
            .push(bus.add_listener(EventKind::MessageArrived, move |event| {
                if let Event::MessageArrived { message, muted } = event {
                    inbox.borrow_mut().apply_incoming(message, *muted);
                }
                Ok(())
            }));

        let inbox = Rc::clone(&self.state);
        state.subscriptions.push(bus.add_listener(
            EventKind::NotificationsFilterChanged,
            move |event| {
                if let Event::NotificationsFilterChanged(filter) = event {
                    inbox.borrow_mut().set_filter(*filter);
                }
                Ok(())
            },
        ));

        let inbox = Rc::clone(&self.state);
        state.subscriptions.push(bus.add_listener(
            EventKind::PreviewsVisibilityChanged,
            move |event| {
                if let Event::PreviewsVisibilityChanged(visible) = event {
                    inbox.borrow_mut().show_previews = *visible;
                }
                Ok(())
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, name: &str, unread: i64, last_activity: i64) -> ConversationSummary {
        ConversationSummary {
            id,
            name: name.to_string(),
            last_sender: name.to_string(),
            last_message: "hello".to_string(),
            last_activity,
            unread,
            muted: false,
        }
    }

    fn message(conversation_id: i64, sender: &str, sent_at: i64) -> Message {
        Message {
            id: 0,
            conversation_id,
            sender: sender.to_string(),
            body: "incoming".to_string(),
            sent_at,
        }
    }

    #[test]
    fn unread_filter_hides_read_conversations() {
        let mut state = InboxState::new(NotificationsFilter::Everything, true);
        state.set_conversations(vec![
            summary(1, "Robin", 2, 300),
            summary(2, "Priya", 0, 200),
            summary(3, "Dad", 1, 100),
        ]);
        assert_eq!(state.visible().len(), 3);

        state.set_filter(NotificationsFilter::Unread);
        let names: Vec<_> = state.visible().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Robin", "Dad"]);
    }

    #[test]
    fn search_narrows_by_name() {
        let mut state = InboxState::new(NotificationsFilter::Everything, true);
        state.set_conversations(vec![
            summary(1, "Robin", 0, 300),
            summary(2, "Priya", 0, 200),
        ]);

        state.search = Input::default().with_value("pri".to_string());
        let names: Vec<_> = state.visible().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Priya"]);
    }

    #[test]
    fn incoming_message_updates_and_reorders_the_row() {
        let mut state = InboxState::new(NotificationsFilter::Everything, true);
        state.set_conversations(vec![
            summary(1, "Robin", 0, 300),
            summary(2, "Priya", 1, 200),
        ]);

        state.apply_incoming(&message(2, "Priya", 400), false);

        let first = state.visible()[0];
        assert_eq!(first.id, 2);
        assert_eq!(first.unread, 2);
        assert_eq!(first.last_message, "incoming");
    }

    #[test]
    fn incoming_message_creates_an_unknown_conversation() {
        let mut state = InboxState::new(NotificationsFilter::Everything, true);
        state.set_conversations(vec![summary(1, "Robin", 0, 300)]);

        state.apply_incoming(&message(9, "Morgan", 400), true);

        let first = state.visible()[0];
        assert_eq!(first.id, 9);
        assert_eq!(first.name, "Morgan");
        assert!(first.muted);
    }

    #[test]
    fn selection_follows_a_shrinking_list() {
        let mut state = InboxState::new(NotificationsFilter::Everything, true);
        state.set_conversations(vec![
            summary(1, "Robin", 1, 300),
            summary(2, "Priya", 0, 200),
            summary(3, "Dad", 0, 100),
        ]);
        state.goto_last();
        assert_eq!(state.table_state.selected(), Some(2));

        // The unread filter leaves a single visible row.
        state.set_filter(NotificationsFilter::Unread);
        assert_eq!(state.table_state.selected(), Some(0));
        assert_eq!(state.selected_conversation().unwrap().id, 1);

        state.set_conversations(vec![]);
        assert_eq!(state.table_state.selected(), None);
    }
}
