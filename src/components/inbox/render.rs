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

//! UI rendering logic for the inbox.
//!
//! This module handles the visual representation of the conversation list,
//! including the optional search bar, unread emphasis, and theme
//! application using the Ratatui widget system.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::{
    components::{InboxView, inbox::InboxState},
    render::icons,
    theme::Theme,
    util::format,
};

const PREVIEW_MAX_CHARS: usize = 80;

impl InboxView {
    pub(crate) fn draw(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let mut state = self.state.borrow_mut();

        let show_search = state.searching || !state.search.value().is_empty();
        let (search_area, table_area) = if show_search {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(area);
            (Some(chunks[0]), chunks[1])
        } else {
            (None, area)
        };

        if let Some(search_area) = search_area {
            draw_search(f, search_area, &state, theme);
        }

        let now = format::now_epoch_secs();

        // Rows own all their text so the table state can be borrowed mutably
        // for rendering afterwards.
        let rows: Vec<Row> = state
            .visible()
            .iter()
            .map(|conversation| {
                let mute_marker = if conversation.muted {
                    icons::ICON_MUTED.to_string()
                } else {
                    String::new()
                };

                let name_style = if conversation.unread > 0 {
                    Style::default().fg(theme.list_name_fg).bold()
                } else {
                    Style::default().fg(theme.list_name_fg)
                };

                // Direct chats repeat the conversation name as the sender,
                // so the prefix is only worth a column when they differ.
                let preview = if !state.show_previews {
                    Line::from("")
                } else {
                    let body = format::truncate(&conversation.last_message, PREVIEW_MAX_CHARS);
                    if conversation.last_sender == conversation.name {
                        Line::from(body).style(Style::default().fg(theme.list_preview_fg))
                    } else {
                        Line::from(vec![
                            Span::styled(
                                format!("{}: ", conversation.last_sender),
                                Style::default().fg(theme.list_sender_fg),
                            ),
                            Span::styled(body, Style::default().fg(theme.list_preview_fg)),
                        ])
                    }
                };

                let unread_badge = if conversation.unread > 0 {
                    format!("{} {}", icons::ICON_UNREAD, conversation.unread)
                } else {
                    String::new()
                };

                let row = Row::new(vec![
                    Cell::from(
                        Line::from(mute_marker).style(Style::default().fg(theme.list_muted_fg)),
                    ),
                    Cell::from(Line::from(conversation.name.clone()).style(name_style)),
                    Cell::from(preview),
                    Cell::from(
                        Line::from(format::relative_time(conversation.last_activity, now))
                            .style(Style::default().fg(theme.list_time_fg))
                            .alignment(Alignment::Right),
                    ),
                    Cell::from(
                        Line::from(unread_badge)
                            .style(Style::default().fg(theme.unread_badge_fg).bold())
                            .alignment(Alignment::Right),
                    ),
                ]);

                if conversation.muted {
                    row.style(Style::default().fg(theme.list_muted_fg))
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Percentage(28),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(6),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from("Conversation"),
                Cell::from("Latest message"),
                Cell::from(Line::from("When").alignment(Alignment::Right)),
                Cell::from(Line::from("New").alignment(Alignment::Right)),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(theme.accent_colour).fg(theme.background_colour))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_colour))
                .title(" Inbox "),
        );

        f.render_stateful_widget(table, table_area, &mut state.table_state);
    }
}

fn draw_search(f: &mut Frame, area: Rect, state: &InboxState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent_colour))
        .title(" Find conversation ");

    f.render_widget(
        Paragraph::new(state.search.value())
            .style(Style::default().fg(theme.list_name_fg))
            .block(block),
        area,
    );

    if state.searching {
        let cursor_x = area.x + 1 + state.search.cursor() as u16;
        let cursor_y = area.y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
