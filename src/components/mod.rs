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

//! Self-contained UI components.
//!
//! Each component pairs a view handle with interior state shared between
//! its bus listeners and its renderer. A component subscribes to the events
//! it renders when it is mounted; nothing here polls or pulls.

mod inbox;
mod settings;
mod status_bar;

pub(crate) use inbox::InboxView;
pub(crate) use settings::SettingsView;
pub(crate) use status_bar::StatusBarView;
