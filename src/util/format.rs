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

use std::time::{SystemTime, UNIX_EPOCH};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Returns the current wall-clock time as seconds since the Unix epoch.
pub(crate) fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Formats a message timestamp as a compact age relative to `now`.
///
/// This is used for the conversation list, where screen space is tight and
/// exact times matter less than recency.
///
/// # Arguments
///
/// * `sent_at` - When the message was sent, in seconds since the Unix epoch.
/// * `now` - The current time, in seconds since the Unix epoch.
///
/// # Examples
///
/// ```
/// assert_eq!(relative_time(0, 30), "now");
/// assert_eq!(relative_time(0, 300), "5m");
/// ```
pub(crate) fn relative_time(sent_at: i64, now: i64) -> String {
    let age = now.saturating_sub(sent_at);

    if age < MINUTE {
        "now".to_string()
    } else if age < HOUR {
        format!("{}m", age / MINUTE)
    } else if age < DAY {
        format!("{}h", age / HOUR)
    } else if age < WEEK {
        format!("{}d", age / DAY)
    } else {
        format!("{}w", age / WEEK)
    }
}

/// Truncates `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was cut.
///
/// Truncation counts characters rather than bytes so multi-byte text never
/// splits mid-character.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_time_buckets() {
        assert_eq!(relative_time(100, 100), "now");
        assert_eq!(relative_time(100, 159), "now");
        assert_eq!(relative_time(0, MINUTE), "1m");
        assert_eq!(relative_time(0, 45 * MINUTE), "45m");
        assert_eq!(relative_time(0, 3 * HOUR + 59), "3h");
        assert_eq!(relative_time(0, 2 * DAY), "2d");
        assert_eq!(relative_time(0, 3 * WEEK), "3w");
    }

    // A clock that goes backwards must not underflow into a huge age.
    #[test]
    fn relative_time_future_timestamp() {
        assert_eq!(relative_time(500, 100), "now");
    }

    #[test]
    fn truncate_short_text_untouched() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn truncate_long_text_gets_ellipsis() {
        assert_eq!(truncate("hello world", 6), "hello…");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
    }
}
