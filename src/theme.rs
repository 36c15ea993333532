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

//! Visual styling and color configuration for the TUI.
//!
//! This module defines the application's color palette and provides utilities
//! for converting colors between Ratatui's internal representation and external
//! formats (such as hexadecimal strings) used for terminal emulator styling.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,

    pub(crate) list_name_fg: Color,
    pub(crate) list_sender_fg: Color,
    pub(crate) list_preview_fg: Color,
    pub(crate) list_time_fg: Color,
    pub(crate) list_muted_fg: Color,
    pub(crate) unread_badge_fg: Color,

    pub(crate) status_bar_fg: Color,
    pub(crate) status_error_fg: Color,

    pub(crate) toggle_on_fg: Color,
    pub(crate) toggle_off_fg: Color,
}

impl Default for Theme {
    // Returns the standard application theme.
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    // Constructs the default theme.
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(24, 26, 38),
            accent_colour: Color::Rgb(137, 180, 250),
            border_colour: Color::Rgb(102, 102, 102),

            list_name_fg: Color::Rgb(255, 255, 255),
            list_sender_fg: Color::Rgb(166, 218, 149),
            list_preview_fg: Color::Rgb(162, 161, 166),
            list_time_fg: Color::Rgb(122, 122, 130),
            list_muted_fg: Color::Rgb(100, 100, 108),
            unread_badge_fg: Color::Rgb(250, 179, 135),

            status_bar_fg: Color::Rgb(162, 161, 166),
            status_error_fg: Color::Rgb(243, 139, 168),

            toggle_on_fg: Color::Rgb(166, 218, 149),
            toggle_off_fg: Color::Rgb(122, 122, 130),
        }
    }

    /// Converts a [`ratatui::style::Color`] into a CSS-style hexadecimal
    /// string.
    ///
    /// This is primarily used to set the terminal emulator's background color
    /// via escape sequences.
    ///
    /// # Arguments
    ///
    /// * `colour` - The Ratatui color to convert. Must be an `Rgb` variant.
    ///
    /// # Panics
    ///
    /// Panics if the provided color is not a [`Color::Rgb`] variant.
    pub(crate) fn to_hex(colour: Color) -> String {
        match colour {
            Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
            _ => panic!("Unexpected non-RGB colour"),
        }
    }
}
