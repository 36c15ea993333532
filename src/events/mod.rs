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

//! Event definitions, dispatch, and the main application loop.
//!
//! Two kinds of event flow through the application and both are defined
//! here:
//!
//! * [`Event`]: application notifications published on the [`EventManager`]
//!   bus. Views and services subscribe to the kinds they care about and
//!   never learn who published them.
//! * [`AppEvent`]: the raw feed of the main loop's mpsc channel. Keyboard
//!   input, render ticks, and bus events produced by background threads all
//!   arrive here, because only the main thread may touch the bus or the
//!   terminal.
//!
//! [`process_events`] drains the channel, routes keys to whichever screen
//! owns them, dispatches published events, and redraws after every event.

pub(crate) mod manager;

pub(crate) use manager::{EventManager, Subscription};

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App, Screen,
    model::{ConversationSummary, Message, NotificationsFilter, SyncState},
    render::draw,
};

/// Notifications published on the event bus.
///
/// The set of variants is the complete contract between publishers and
/// listeners: each variant carries exactly the payload its consumers need,
/// so a listener never reaches outside the event for context.
#[derive(Debug, Clone)]
pub(crate) enum Event {
    /// The settings screen should open.
    OpenMessagesSettings,
    /// The settings screen should close, returning to the inbox.
    CloseMessagesSettings,

    /// The user changed which conversations the inbox shows.
    NotificationsFilterChanged(NotificationsFilter),
    /// The user toggled message preview text in the conversation list.
    PreviewsVisibilityChanged(bool),
    /// The user toggled the audible new-message cue.
    SoundEnabledChanged(bool),

    /// A fresh conversation list was loaded from the local store.
    ConversationsUpdated(Vec<ConversationSummary>),
    /// A new message landed in the store. `muted` reflects the conversation
    /// it belongs to, so listeners can decide whether to alert.
    MessageArrived { message: Message, muted: bool },

    /// A background refresh started or finished.
    SyncStateChanged(SyncState),
    /// A background operation failed; the payload is shown to the user.
    Error(String),
}

/// The subscribable half of [`Event`]: what a listener registers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventKind {
    OpenMessagesSettings,
    CloseMessagesSettings,
    NotificationsFilterChanged,
    PreviewsVisibilityChanged,
    SoundEnabledChanged,
    ConversationsUpdated,
    MessageArrived,
    SyncStateChanged,
    Error,
}

impl Event {
    /// The kind this event is dispatched under.
    pub(crate) fn kind(&self) -> EventKind {
        match self {
            Event::OpenMessagesSettings => EventKind::OpenMessagesSettings,
            Event::CloseMessagesSettings => EventKind::CloseMessagesSettings,
            Event::NotificationsFilterChanged(_) => EventKind::NotificationsFilterChanged,
            Event::PreviewsVisibilityChanged(_) => EventKind::PreviewsVisibilityChanged,
            Event::SoundEnabledChanged(_) => EventKind::SoundEnabledChanged,
            Event::ConversationsUpdated(_) => EventKind::ConversationsUpdated,
            Event::MessageArrived { .. } => EventKind::MessageArrived,
            Event::SyncStateChanged(_) => EventKind::SyncStateChanged,
            Event::Error(_) => EventKind::Error,
        }
    }
}

/// Everything the main loop can receive over its channel.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,

    /// An event to dispatch on the bus. Background threads must not touch
    /// the bus directly; they send this instead and the main loop dispatches
    /// on their behalf.
    Publish(Event),

    ExitApplication,
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Publish(event) => app.bus.dispatch(event),
            _ => {}
        }

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}

/// Routes a key press to whichever part of the UI currently owns the
/// keyboard.
///
/// While the inbox search bar is active it captures everything, so typing a
/// conversation name cannot trigger shortcuts. Otherwise the quit chords are
/// handled globally and the rest goes to the visible screen. A handler that
/// wants to notify the rest of the application returns an [`Event`], which
/// is dispatched here once the handler has released its state borrows.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.screen.get() == Screen::Inbox && app.inbox.is_searching() {
        if let Some(event) = app.inbox.handle_key(key, &app.task_tx)? {
            app.bus.dispatch(event);
        }
        return Ok(());
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            return Ok(());
        }
        _ => {}
    }

    let published = match app.screen.get() {
        Screen::Inbox => app.inbox.handle_key(key, &app.task_tx)?,
        Screen::Settings => app.settings.handle_key(key)?,
    };

    if let Some(event) = published {
        app.bus.dispatch(event);
    }

    Ok(())
}
