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

//! UI rendering logic for the settings screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    components::SettingsView,
    components::settings::{ROW_FILTER, ROW_PREVIEWS, ROW_SOUND},
    theme::Theme,
    util::format,
};

impl SettingsView {
    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let state = self.state.borrow();
        let now = format::now_epoch_secs();

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(""));
        lines.push(setting_line(
            ROW_FILTER,
            state.selected,
            "Notifications filter",
            Span::styled(
                state.filter.label(),
                Style::default().fg(theme.accent_colour),
            ),
            theme,
        ));
        lines.push(setting_line(
            ROW_PREVIEWS,
            state.selected,
            "Message previews",
            toggle_span(state.show_previews, theme),
            theme,
        ));
        lines.push(setting_line(
            ROW_SOUND,
            state.selected,
            "New message sound",
            toggle_span(state.sound_enabled, theme),
            theme,
        ));

        lines.push(Line::from(""));

        let sync = match state.sync_changed_at {
            Some(at) => format!(
                "{} ({})",
                state.sync_state.label(),
                format::relative_time(at, now)
            ),
            None => state.sync_state.label().to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {:<24}", "Background sync"),
                Style::default().fg(theme.list_muted_fg),
            ),
            Span::styled(sync, Style::default().fg(theme.list_muted_fg)),
        ]));

        lines.push(Line::from(""));
        lines.push(Line::styled(
            "   space toggle, esc back",
            Style::default().fg(theme.list_muted_fg),
        ));

        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border_colour))
                    .title(" Messages settings "),
            ),
            area,
        );
    }
}

fn setting_line<'a>(
    row: usize,
    selected: usize,
    label: &'a str,
    value: Span<'a>,
    theme: &Theme,
) -> Line<'a> {
    let marker = if row == selected { " > " } else { "   " };
    let label_style = if row == selected {
        Style::default().fg(theme.list_name_fg).bold()
    } else {
        Style::default().fg(theme.list_name_fg)
    };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent_colour)),
        Span::styled(format!("{:<24}", label), label_style),
        value,
    ])
}

fn toggle_span(enabled: bool, theme: &Theme) -> Span<'static> {
    if enabled {
        Span::styled("on", Style::default().fg(theme.toggle_on_fg).bold())
    } else {
        Span::styled("off", Style::default().fg(theme.toggle_off_fg))
    }
}
