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

//! The messages settings screen.
//!
//! Settings is the only view that comes and goes at runtime: it is mounted
//! on the bus when it opens and unmounted again when it closes, both from
//! inside a dispatch pass. While it is open it mirrors the notification
//! preferences and shows the state of background sync.

mod event;
mod render;

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    config::AppConfig,
    events::{Event, EventKind, EventManager, Subscription},
    model::{NotificationsFilter, SyncState},
    util::format,
};

/// The interactive rows, top to bottom.
pub(crate) const ROW_FILTER: usize = 0;
pub(crate) const ROW_PREVIEWS: usize = 1;
pub(crate) const ROW_SOUND: usize = 2;
pub(crate) const ROW_COUNT: usize = 3;

pub(crate) struct SettingsState {
    pub(crate) filter: NotificationsFilter,
    pub(crate) show_previews: bool,
    pub(crate) sound_enabled: bool,

    pub(crate) selected: usize,

    pub(crate) sync_state: SyncState,
    pub(crate) sync_changed_at: Option<i64>,

    subscriptions: Vec<Subscription>,
}

impl SettingsState {
    fn new() -> Self {
        Self {
            filter: NotificationsFilter::Everything,
            show_previews: true,
            sound_enabled: true,
            selected: ROW_FILTER,
            sync_state: SyncState::Idle,
            sync_changed_at: None,
            subscriptions: vec![],
        }
    }
}

#[derive(Clone)]
pub(crate) struct SettingsView {
    state: Rc<RefCell<SettingsState>>,
}

impl SettingsView {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SettingsState::new())),
        }
    }

    /// Prepares the screen for display and registers its listeners.
    ///
    /// The current preferences are copied out of `config` so the rows show
    /// what is persisted, not what the screen remembered from last time.
    /// Mounting again replaces any previous registrations.
    pub(crate) fn mount(&self, bus: &EventManager, config: &AppConfig) {
        let mut state = self.state.borrow_mut();

        for subscription in state.subscriptions.drain(..) {
            bus.remove_listener(subscription);
        }

        state.filter = config.notifications_filter;
        state.show_previews = config.show_previews;
        state.sound_enabled = config.sound_enabled;
        state.selected = ROW_FILTER;

        let settings = Rc::clone(&self.state);
        state
            .subscriptions
            .push(bus.add_listener(EventKind::SyncStateChanged, move |event| {
                if let Event::SyncStateChanged(sync_state) = event {
                    let mut state = settings.borrow_mut();
                    state.sync_state = *sync_state;
                    state.sync_changed_at = Some(format::now_epoch_secs());
                }
                Ok(())
            }));
    }

    /// Detaches the screen from the bus. Safe to call when not mounted.
    pub(crate) fn unmount(&self, bus: &EventManager) {
        let mut state = self.state.borrow_mut();
        for subscription in state.subscriptions.drain(..) {
            bus.remove_listener(subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            version: 1,
            notifications_filter: NotificationsFilter::Unread,
            show_previews: false,
            sound_enabled: true,
            feed_interval_secs: 0,
        }
    }

    #[test]
    fn mount_copies_the_persisted_preferences() {
        let bus = EventManager::new();
        let view = SettingsView::new();

        view.mount(&bus, &test_config());

        let state = view.state.borrow();
        assert_eq!(state.filter, NotificationsFilter::Unread);
        assert!(!state.show_previews);
        assert!(state.sound_enabled);
        assert_eq!(state.selected, ROW_FILTER);
    }

    #[test]
    fn mounted_screen_tracks_sync_state() {
        let bus = EventManager::new();
        let view = SettingsView::new();

        view.mount(&bus, &test_config());
        bus.dispatch(Event::SyncStateChanged(SyncState::Syncing));
        assert_eq!(view.state.borrow().sync_state, SyncState::Syncing);

        // Once unmounted the screen no longer hears the bus.
        view.unmount(&bus);
        bus.dispatch(Event::SyncStateChanged(SyncState::Idle));
        assert_eq!(view.state.borrow().sync_state, SyncState::Syncing);
    }

    #[test]
    fn remounting_does_not_stack_subscriptions() {
        let bus = EventManager::new();
        let view = SettingsView::new();

        view.mount(&bus, &test_config());
        view.mount(&bus, &test_config());

        assert_eq!(view.state.borrow().subscriptions.len(), 1);
    }

    #[test]
    fn unmount_without_mount_is_harmless() {
        let bus = EventManager::new();
        let view = SettingsView::new();
        view.unmount(&bus);
        view.unmount(&bus);
    }
}
