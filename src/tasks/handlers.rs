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

use anyhow::Result;

use crate::{
    db,
    events::Event,
    model::SyncState,
    tasks::TaskContext,
    util::format::now_epoch_secs,
};

pub(super) fn refresh_conversations(ctx: &TaskContext) -> Result<()> {
    ctx.publish(Event::SyncStateChanged(SyncState::Syncing))?;

    // The sync indicator must come back down even when the fetch fails.
    let summaries = match db::fetch_conversation_summaries(ctx.conn) {
        Ok(summaries) => summaries,
        Err(e) => {
            ctx.publish(Event::SyncStateChanged(SyncState::Idle))?;
            return Err(e.into());
        }
    };

    tracing::debug!(conversations = summaries.len(), "refreshed conversation list");
    ctx.publish(Event::ConversationsUpdated(summaries))?;
    ctx.publish(Event::SyncStateChanged(SyncState::Idle))?;

    Ok(())
}

pub(super) fn mark_read(ctx: &TaskContext, conversation_id: i64) -> Result<()> {
    let changed = db::mark_conversation_read(ctx.conn, conversation_id)?;
    tracing::debug!(conversation_id, changed, "marked conversation read");

    let summaries = db::fetch_conversation_summaries(ctx.conn)?;
    ctx.publish(Event::ConversationsUpdated(summaries))?;

    Ok(())
}

pub(super) fn set_muted(ctx: &TaskContext, conversation_id: i64, muted: bool) -> Result<()> {
    db::set_conversation_muted(ctx.conn, conversation_id, muted)?;
    tracing::debug!(conversation_id, muted, "updated conversation mute flag");

    let summaries = db::fetch_conversation_summaries(ctx.conn)?;
    ctx.publish(Event::ConversationsUpdated(summaries))?;

    Ok(())
}

pub(super) fn ingest_incoming(ctx: &TaskContext) -> Result<()> {
    let Some((message, muted)) = db::seed::random_incoming(ctx.conn, now_epoch_secs())? else {
        return Ok(());
    };

    tracing::debug!(
        message_id = message.id,
        conversation_id = message.conversation_id,
        "stored incoming message"
    );
    ctx.publish(Event::MessageArrived { message, muted })?;

    Ok(())
}
