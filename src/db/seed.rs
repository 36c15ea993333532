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

//! Demo data for the message store.
//!
//! There is no real messaging backend wired up, so an empty store is seeded
//! with a handful of conversations and a short backdated history, and the
//! simulated feed draws new incoming messages from the same pool of senders.

use rand::{rng, seq::IndexedRandom};
use rusqlite::Connection;

use crate::{db::StoreError, model::Message};

const HOUR: i64 = 3600;

const SAMPLE_CONVERSATIONS: &[(&str, bool)] = &[
    ("Robin", false),
    ("Priya", false),
    ("Dad", false),
    ("Sam", true),
    ("Morgan", false),
    ("Jess", false),
];

const SAMPLE_BODIES: &[&str] = &[
    "Are you around later?",
    "Just saw this and thought of you",
    "Running about ten minutes late, sorry!",
    "Did you get the thing I sent?",
    "Lunch tomorrow?",
    "That was brilliant",
    "Call me when you're free",
    "On my way now",
    "Can you resend the address?",
    "No worries, another time then",
];

/// Populates an empty store with the sample conversations.
///
/// Does nothing when the store already has conversations. Returns whether
/// seeding happened.
///
/// # Errors
///
/// Returns an error if any of the inserts fail.
pub(crate) fn seed_if_empty(conn: &Connection) -> Result<bool, StoreError> {
    let conversations: i64 =
        conn.query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))?;
    if conversations > 0 {
        return Ok(false);
    }

    let now = crate::util::format::now_epoch_secs();
    for (index, (name, muted)) in SAMPLE_CONVERSATIONS.iter().enumerate() {
        let conversation_id = super::insert_conversation(conn, name, *muted)?;

        // A short backdated history per conversation, oldest first. The
        // newest message is left unread in some conversations so the inbox
        // starts with badges to show.
        let backlog = 2 + index % 3;
        for position in 0..backlog {
            let newest = position == backlog - 1;
            let read = !(newest && (index % 2 == 0 || *muted));
            let age = ((backlog - position) as i64) * HOUR * (index as i64 + 1);
            let body = SAMPLE_BODIES[(index * 3 + position) % SAMPLE_BODIES.len()];
            super::insert_message(conn, conversation_id, name, body, now - age, read)?;
        }
    }

    tracing::info!("seeded message store with sample conversations");
    Ok(true)
}

/// Inserts one simulated incoming message into a randomly chosen
/// conversation.
///
/// Returns the stored message and the mute flag of its conversation, or
/// `None` when the store has no conversations to deliver into.
///
/// # Errors
///
/// Returns an error if the conversations cannot be listed or the insert
/// fails.
pub(crate) fn random_incoming(
    conn: &Connection,
    now: i64,
) -> Result<Option<(Message, bool)>, StoreError> {
    let mut stmt = conn.prepare_cached("SELECT id, name, muted FROM conversations")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, bool>(2)?,
        ))
    })?;

    let mut conversations = Vec::new();
    for row in rows {
        conversations.push(row?);
    }

    let mut rng = rng();
    let Some((conversation_id, name, muted)) = conversations.choose(&mut rng) else {
        return Ok(None);
    };
    let body = SAMPLE_BODIES.choose(&mut rng).copied().unwrap_or("ping");

    let message = super::insert_message(conn, *conversation_id, name, body, now, false)?;
    Ok(Some((message, *muted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn seeding_only_happens_once() {
        let conn = test_store();

        assert!(seed_if_empty(&conn).unwrap());
        let first = crate::db::fetch_conversation_summaries(&conn).unwrap();
        assert_eq!(first.len(), SAMPLE_CONVERSATIONS.len());
        assert!(first.iter().any(|summary| summary.unread > 0));

        assert!(!seed_if_empty(&conn).unwrap());
        let second = crate::db::fetch_conversation_summaries(&conn).unwrap();
        assert_eq!(second.len(), first.len());
    }

    #[test]
    fn random_incoming_needs_a_conversation() {
        let conn = test_store();
        assert!(random_incoming(&conn, 1000).unwrap().is_none());
    }

    #[test]
    fn random_incoming_lands_in_an_existing_conversation() {
        let conn = test_store();
        let id = crate::db::insert_conversation(&conn, "Robin", true).unwrap();

        let (message, muted) = random_incoming(&conn, 1000).unwrap().unwrap();
        assert_eq!(message.conversation_id, id);
        assert_eq!(message.sender, "Robin");
        assert_eq!(message.sent_at, 1000);
        assert!(muted);

        let summaries = crate::db::fetch_conversation_summaries(&conn).unwrap();
        assert_eq!(summaries[0].unread, 1);
        assert_eq!(summaries[0].last_message, message.body);
    }
}
