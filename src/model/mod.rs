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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application: conversations,
//! messages, and the user-facing filter and sync states. These are the shapes
//! exchanged between the local cache, the background sync worker, and the UI
//! screens.

use serde::{Deserialize, Serialize};

/// One row of the inbox: a conversation plus the denormalised fields the
/// list screen needs to render it without further queries.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: i64,
    pub name: String,
    pub last_sender: String,
    pub last_message: String,
    /// Seconds since the Unix epoch of the most recent message.
    pub last_activity: i64,
    pub unread: i64,
    pub muted: bool,
}

/// A single message within a conversation.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: String,
    pub body: String,
    /// Seconds since the Unix epoch.
    pub sent_at: i64,
}

/// Which conversations the inbox shows.
///
/// Persisted in the application configuration so the choice survives
/// restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationsFilter {
    /// Every conversation, muted or not.
    Everything,
    /// Only conversations with unread messages.
    Unread,
}

impl NotificationsFilter {
    /// Advances to the next filter, wrapping around.
    pub(crate) fn cycled(self) -> Self {
        match self {
            NotificationsFilter::Everything => NotificationsFilter::Unread,
            NotificationsFilter::Unread => NotificationsFilter::Everything,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            NotificationsFilter::Everything => "everything",
            NotificationsFilter::Unread => "unread only",
        }
    }
}

/// Whether the background worker currently has a refresh in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncState {
    Idle,
    Syncing,
}

impl SyncState {
    pub(crate) fn label(self) -> &'static str {
        match self {
            SyncState::Idle => "idle",
            SyncState::Syncing => "syncing",
        }
    }
}
