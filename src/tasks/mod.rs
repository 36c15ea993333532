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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload potentially
//! blocking message store access from the main UI thread. It provides a
//! dedicated worker loop that translates [`AppTask`] requests into store
//! operations and publishes the results back to the application as bus
//! [`Event`]s, routed through the main loop.
//!
//! Only actions that may block, or may take more than a trivial amount of
//! time to process, should be implemented as tasks. Other actions are likely
//! more suited to bus events.

mod handlers;
use handlers::*;

use anyhow::Result;
use rusqlite::Connection;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::{
    db,
    events::{AppEvent, Event},
};

const DATABASE_FILE: &str = "courier.db";

#[derive(Debug)]
pub(crate) enum AppTask {
    /// Reload every conversation summary from the store.
    RefreshConversations,

    /// Mark all messages in the conversation as read.
    MarkConversationRead(i64),
    /// Set the mute flag of the conversation.
    SetConversationMuted(i64, bool),

    /// Store one simulated incoming message.
    IngestIncomingMessage,
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread initializes its own message store connection, seeds
/// the store when it is empty, and enters a blocking loop listening for
/// incoming [`AppTask`]s.
///
/// # Arguments
///
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the main loop channel, used to publish
///   results on the bus.
pub(crate) fn spawn_task_worker(task_rx: Receiver<AppTask>, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let conn = db::init_db(DATABASE_FILE).expect("Failed to initialise message store");
        db::seed::seed_if_empty(&conn).expect("Failed to seed message store");

        while let Ok(task) = task_rx.recv() {
            let ctx = TaskContext {
                event_tx: &event_tx,
                conn: &conn,
            };

            if let Err(e) = handle_task(task, &ctx) {
                tracing::warn!("task failed: {e:#}");
                let _ = event_tx.send(AppEvent::Publish(Event::Error(e.to_string())));
            }
        }
    });
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    event_tx: &'a Sender<AppEvent>,
    conn: &'a Connection,
}

impl TaskContext<'_> {
    /// Hands a bus event to the main loop, which dispatches it there.
    fn publish(&self, event: Event) -> Result<()> {
        self.event_tx.send(AppEvent::Publish(event))?;
        Ok(())
    }
}

/// Orchestrates the execution of a single task.
///
/// This function implements the logic for each task and publishes the result
/// back through the application event channel.
fn handle_task(task: AppTask, ctx: &TaskContext) -> Result<()> {
    match task {
        AppTask::RefreshConversations => refresh_conversations(ctx),

        AppTask::MarkConversationRead(id) => mark_read(ctx, id),
        AppTask::SetConversationMuted(id, muted) => set_muted(ctx, id, muted),

        AppTask::IngestIncomingMessage => ingest_incoming(ctx),
    }
}
