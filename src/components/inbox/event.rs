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

//! Keyboard handling for the inbox.
//!
//! Store mutations (read, mute, refresh) leave as [`AppTask`]s; anything
//! the rest of the application should hear about comes back to the caller
//! as a bus [`Event`] to dispatch once the inbox state borrow is released.

use std::sync::mpsc::Sender;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent};
use tui_input::backend::crossterm::EventHandler;

use crate::{
    components::InboxView,
    events::Event,
    tasks::AppTask,
};

impl InboxView {
    pub(crate) fn handle_key(
        &self,
        key: KeyEvent,
        task_tx: &Sender<AppTask>,
    ) -> Result<Option<Event>> {
        let mut state = self.state.borrow_mut();

        // Search entry swallows every key until it is closed.
        if state.searching {
            match key.code {
                KeyCode::Esc => {
                    state.searching = false;
                    state.search.reset();
                    state.clamp_selection();
                }
                KeyCode::Enter => state.searching = false,
                _ => {
                    state.search.handle_event(&CrosstermEvent::Key(key));
                    state.clamp_selection();
                }
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => state.goto_next(),
            KeyCode::Char('k') | KeyCode::Up => state.goto_previous(),
            KeyCode::Char('g') => state.goto_first(),
            KeyCode::Char('G') => state.goto_last(),

            KeyCode::Char('/') => {
                state.search.reset();
                state.searching = true;
            }

            KeyCode::Char('s') => return Ok(Some(Event::OpenMessagesSettings)),

            KeyCode::Char('r') => task_tx.send(AppTask::RefreshConversations)?,

            KeyCode::Char('m') => {
                if let Some(conversation) = state.selected_conversation() {
                    task_tx.send(AppTask::SetConversationMuted(
                        conversation.id,
                        !conversation.muted,
                    ))?;
                }
            }

            KeyCode::Enter => {
                if let Some(conversation) = state.selected_conversation() {
                    if conversation.unread > 0 {
                        task_tx.send(AppTask::MarkConversationRead(conversation.id))?;
                    }
                }
            }

            _ => {}
        }

        Ok(None)
    }
}
