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

//! Keyboard handling for the settings screen.
//!
//! Toggling a row updates the local copy immediately and hands the matching
//! bus [`Event`] back to the caller; persistence and every other interested
//! party react to that event rather than to the key press.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::{
    components::SettingsView,
    components::settings::{ROW_COUNT, ROW_FILTER, ROW_PREVIEWS, ROW_SOUND},
    events::Event,
};

impl SettingsView {
    pub(crate) fn handle_key(&self, key: KeyEvent) -> Result<Option<Event>> {
        let mut state = self.state.borrow_mut();

        let published = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                state.selected = (state.selected + 1) % ROW_COUNT;
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.selected = (state.selected + ROW_COUNT - 1) % ROW_COUNT;
                None
            }

            KeyCode::Char(' ') | KeyCode::Enter => match state.selected {
                ROW_FILTER => {
                    state.filter = state.filter.cycled();
                    Some(Event::NotificationsFilterChanged(state.filter))
                }
                ROW_PREVIEWS => {
                    state.show_previews = !state.show_previews;
                    Some(Event::PreviewsVisibilityChanged(state.show_previews))
                }
                ROW_SOUND => {
                    state.sound_enabled = !state.sound_enabled;
                    Some(Event::SoundEnabledChanged(state.sound_enabled))
                }
                _ => None,
            },

            KeyCode::Esc => Some(Event::CloseMessagesSettings),

            _ => None,
        };

        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossterm::event::KeyModifiers;

    use crate::model::NotificationsFilter;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn toggling_the_filter_row_cycles_and_publishes() {
        let view = SettingsView::new();

        let published = view.handle_key(key(KeyCode::Char(' '))).unwrap();
        assert!(matches!(
            published,
            Some(Event::NotificationsFilterChanged(NotificationsFilter::Unread))
        ));
        assert_eq!(view.state.borrow().filter, NotificationsFilter::Unread);
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let view = SettingsView::new();

        view.handle_key(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(view.state.borrow().selected, ROW_SOUND);

        view.handle_key(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(view.state.borrow().selected, ROW_FILTER);
    }

    #[test]
    fn toggling_previews_and_sound_publishes_the_new_value() {
        let view = SettingsView::new();

        view.handle_key(key(KeyCode::Char('j'))).unwrap();
        let published = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            published,
            Some(Event::PreviewsVisibilityChanged(false))
        ));

        view.handle_key(key(KeyCode::Char('j'))).unwrap();
        let published = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(published, Some(Event::SoundEnabledChanged(false))));
    }

    #[test]
    fn escape_requests_close() {
        let view = SettingsView::new();
        let published = view.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(matches!(published, Some(Event::CloseMessagesSettings)));
    }
}
