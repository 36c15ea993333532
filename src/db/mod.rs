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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite message store,
//! including schema creation, conversation summaries, and read/mute state.
//! It uses cached statements to optimize frequently executed queries.
//!
//! # Tables
//!
//! * `conversations` - One row per chat thread, with its mute flag.
//! * `messages` - Individual messages, linked to a conversation, with a
//!   per-message read flag.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

pub(crate) mod seed;

use rusqlite::{Connection, params};
use thiserror::Error;

use crate::model::{ConversationSummary, Message};

/// Errors produced by the message store.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to open message store: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("message store left journal mode as {0:?}")]
    JournalMode(String),

    #[error("failed to create message store schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("message store query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Opens a connection to the SQLite message store and configures performance
/// settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Performance Tuning**: Sets synchronous mode to `NORMAL` and increases the cache size.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Arguments
///
/// * `path` - The file system path to the SQLite database file.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(StoreError::Open)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        return Err(StoreError::JournalMode(journal_mode));
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -64000; -- Use 64MB of RAM for cache
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the message store schema.
///
/// This function creates the `conversations` and `messages` tables if they
/// do not already exist.
///
/// It also sets up:
///
/// * **Foreign Key Constraints**: Automated cleanup via `ON DELETE CASCADE`.
/// * **Performance Indices**: Indices for the per-conversation queries and
///   unread counts.
/// * **Uniqueness Constraints**: Prevention of duplicate conversation names.
///
/// This operation is wrapped in a single SQL transaction to ensure the schema
/// is updated atomically.
///
/// # Errors
///
/// Returns an error if the transaction fails, if there are permission issues
/// with the database file, or if the SQL syntax is invalid.
fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL COLLATE NOCASE UNIQUE,
            muted INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            conversation_id INTEGER NOT NULL,
            sender TEXT NOT NULL,
            body TEXT NOT NULL,
            sent_at INTEGER NOT NULL,
            read INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (conversation_id) REFERENCES conversations (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_messages_conversation_id ON messages (conversation_id);
        CREATE INDEX IF NOT EXISTS idx_messages_unread ON messages (conversation_id, read);

        COMMIT;",
    )
    .map_err(StoreError::Schema)
}

/// Fetches the inbox view of every conversation, newest activity first.
///
/// Each summary carries the latest message of the conversation and a count
/// of its unread messages. Conversations with no messages yet are omitted,
/// matching what the inbox can usefully show.
///
/// # Arguments
///
/// * `conn` - A reference to the SQLite connection.
///
/// # Errors
///
/// Returns an error if the SQL query fails or if there is a type mismatch
/// when mapping the database rows to the [`ConversationSummary`] struct.
///
/// # Examples
///
/// ```ignore
/// let summaries = fetch_conversation_summaries(&conn).expect("Failed to fetch inbox");
/// assert!(summaries.windows(2).all(|w| w[0].last_activity >= w[1].last_activity));
/// ```
pub(crate) fn fetch_conversation_summaries(
    conn: &Connection,
) -> Result<Vec<ConversationSummary>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT c.id, c.name, m.sender, m.body, m.sent_at,
                (SELECT COUNT(*) FROM messages u
                 WHERE u.conversation_id = c.id AND u.read = 0) AS unread,
                c.muted
         FROM conversations c
         JOIN messages m ON m.id = (
             SELECT id FROM messages
             WHERE conversation_id = c.id
             ORDER BY sent_at DESC, id DESC
             LIMIT 1
         )
         ORDER BY m.sent_at DESC, m.id DESC
    ",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(ConversationSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            last_sender: row.get(2)?,
            last_message: row.get(3)?,
            last_activity: row.get(4)?,
            unread: row.get(5)?,
            muted: row.get(6)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }

    Ok(results)
}

/// Marks every message in the conversation as read.
///
/// # Arguments
///
/// * `conn` - A reference to the SQLite connection.
/// * `conversation_id` - The conversation to clear.
///
/// Returns the number of messages that changed state, which is zero when the
/// conversation was already fully read.
///
/// # Errors
///
/// Returns an error if the SQL update fails.
pub(crate) fn mark_conversation_read(
    conn: &Connection,
    conversation_id: i64,
) -> Result<usize, StoreError> {
    let mut stmt = conn.prepare_cached(
        "UPDATE messages SET read = 1 WHERE conversation_id = ?1 AND read = 0",
    )?;
    let changed = stmt.execute(params![conversation_id])?;
    Ok(changed)
}

/// Sets the mute flag of a conversation.
///
/// # Errors
///
/// Returns an error if the SQL update fails.
pub(crate) fn set_conversation_muted(
    conn: &Connection,
    conversation_id: i64,
    muted: bool,
) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached("UPDATE conversations SET muted = ?1 WHERE id = ?2")?;
    stmt.execute(params![muted, conversation_id])?;
    Ok(())
}

/// Inserts a conversation and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails, for example when the name is
/// already taken.
pub(crate) fn insert_conversation(
    conn: &Connection,
    name: &str,
    muted: bool,
) -> Result<i64, StoreError> {
    let mut stmt =
        conn.prepare_cached("INSERT INTO conversations (name, muted) VALUES (?1, ?2)")?;
    stmt.execute(params![name, muted])?;
    Ok(conn.last_insert_rowid())
}

/// Inserts a message and returns it with its assigned id.
///
/// # Arguments
///
/// * `conn` - A reference to the SQLite connection.
/// * `conversation_id` - The conversation the message belongs to.
/// * `sender` - Display name of the author.
/// * `body` - The message text.
/// * `sent_at` - Unix timestamp of the message.
/// * `read` - Whether the message starts out read, used for backdated
///   history.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub(crate) fn insert_message(
    conn: &Connection,
    conversation_id: i64,
    sender: &str,
    body: &str,
    sent_at: i64,
    read: bool,
) -> Result<Message, StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO messages (conversation_id, sender, body, sent_at, read)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    stmt.execute(params![conversation_id, sender, body, sent_at, read])?;

    Ok(Message {
        id: conn.last_insert_rowid(),
        conversation_id,
        sender: sender.to_string(),
        body: body.to_string(),
        sent_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn summaries_are_ordered_by_recency() {
        let conn = test_store();

        let older = insert_conversation(&conn, "Robin", false).unwrap();
        insert_message(&conn, older, "Robin", "first", 100, true).unwrap();

        let newer = insert_conversation(&conn, "Priya", false).unwrap();
        insert_message(&conn, newer, "Priya", "second", 200, true).unwrap();

        let summaries = fetch_conversation_summaries(&conn).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, newer);
        assert_eq!(summaries[0].last_message, "second");
        assert_eq!(summaries[1].id, older);
    }

    #[test]
    fn summary_carries_the_latest_message() {
        let conn = test_store();

        let id = insert_conversation(&conn, "Robin", false).unwrap();
        insert_message(&conn, id, "Robin", "old", 100, true).unwrap();
        insert_message(&conn, id, "Robin", "new", 300, false).unwrap();

        let summaries = fetch_conversation_summaries(&conn).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].last_message, "new");
        assert_eq!(summaries[0].last_activity, 300);
        assert_eq!(summaries[0].unread, 1);
    }

    #[test]
    fn empty_conversations_are_omitted() {
        let conn = test_store();

        insert_conversation(&conn, "Robin", false).unwrap();

        assert!(fetch_conversation_summaries(&conn).unwrap().is_empty());
    }

    #[test]
    fn mark_read_clears_the_unread_count() {
        let conn = test_store();

        let id = insert_conversation(&conn, "Robin", false).unwrap();
        for n in 0..3 {
            insert_message(&conn, id, "Robin", "hi", 100 + n, false).unwrap();
        }

        assert_eq!(mark_conversation_read(&conn, id).unwrap(), 3);
        assert_eq!(fetch_conversation_summaries(&conn).unwrap()[0].unread, 0);

        // Already read, nothing left to change.
        assert_eq!(mark_conversation_read(&conn, id).unwrap(), 0);
    }

    #[test]
    fn mute_flag_round_trips() {
        let conn = test_store();

        let id = insert_conversation(&conn, "Sam", false).unwrap();
        insert_message(&conn, id, "Sam", "hi", 100, true).unwrap();
        assert!(!fetch_conversation_summaries(&conn).unwrap()[0].muted);

        set_conversation_muted(&conn, id, true).unwrap();
        assert!(fetch_conversation_summaries(&conn).unwrap()[0].muted);

        set_conversation_muted(&conn, id, false).unwrap();
        assert!(!fetch_conversation_summaries(&conn).unwrap()[0].muted);
    }
}
