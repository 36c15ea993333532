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

//! Render the status bar line.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    components::StatusBarView,
    model::{NotificationsFilter, SyncState},
    render::icons,
    theme::Theme,
    util::format,
};

impl StatusBarView {
    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let state = self.state.borrow();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(42)])
            .horizontal_margin(1)
            .split(area);

        let mut left: Vec<Span> = Vec::new();
        if state.unread_total > 0 {
            left.push(Span::styled(
                format!("{} {} unread", icons::ICON_UNREAD, state.unread_total),
                Style::default().fg(theme.unread_badge_fg).bold(),
            ));
        } else {
            left.push(Span::styled(
                "no unread messages",
                Style::default().fg(theme.status_bar_fg),
            ));
        }
        if state.filter == NotificationsFilter::Unread {
            left.push(Span::raw("  "));
            left.push(Span::styled(
                "[unread only]",
                Style::default().fg(theme.accent_colour),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(left)), chunks[0]);

        let right = if let Some(error) = &state.last_error {
            Span::styled(
                format!("! {}", format::truncate(error, 38)),
                Style::default().fg(theme.status_error_fg).bold(),
            )
        } else if state.sync_state == SyncState::Syncing {
            Span::styled(
                format!("{} syncing", icons::ICON_SYNC),
                Style::default().fg(theme.accent_colour),
            )
        } else {
            Span::raw("")
        };
        f.render_widget(
            Paragraph::new(Line::from(right)).alignment(Alignment::Right),
            chunks[1],
        );
    }
}
