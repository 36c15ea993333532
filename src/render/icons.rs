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

//! Unicode symbols for the TUI.
//!
//! This module contains standardized icons used across the interface to
//! represent message and sync status. These are selected for compatibility
//! with most modern terminal emulators and fonts, avoiding double-width
//! emoji so table columns stay aligned.

// Unread marker (black circle)
pub(crate) const ICON_UNREAD: &str = "\u{25CF}";

// Muted conversation (bell with cancellation stroke, text-style variant via
// Variation Selector-15 [\u{FE0E}] so terminals render it monochrome)
pub(crate) const ICON_MUTED: &str = "\u{1F515}\u{FE0E}";

// Background sync in flight (clockwise open-circle arrow)
pub(crate) const ICON_SYNC: &str = "\u{21BB}";
