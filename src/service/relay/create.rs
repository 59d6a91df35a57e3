//! Relaying of new messages.

use std::collections::HashMap;

use futures::future::join_all;
use serenity::all::{ChannelId, MessageId};

use crate::{
    error::dispatch::DispatchError,
    model::{
        message::{InboundMessage, OutboundMessage},
        relay::{DropReason, OriginKey, RelayOutcome, RelayedMessage},
    },
    service::{dispatcher::Dispatcher, render::render},
};

use super::RelayService;

impl RelayService {
    /// Relays a new message to every other channel of its wormhole group.
    ///
    /// Holds the origin's correlation lock for the whole fan-out so an edit or delete
    /// arriving meanwhile waits for the copies to exist. When an edit of the message got
    /// the lock first, the edited content is relayed instead. Copies are sent
    /// concurrently and a failing destination never affects the others. A correlation
    /// is recorded only when at least one copy was delivered.
    ///
    /// # Arguments
    /// - `dispatcher` - Dispatcher performing the sends
    /// - `message` - The new message
    ///
    /// # Returns
    /// - `RelayOutcome::Dropped` - The message is not relayed, with the reason
    /// - `RelayOutcome::Relayed` - Number of delivered and failed copies
    pub async fn relay_message(
        &self,
        dispatcher: &dyn Dispatcher,
        message: &InboundMessage,
    ) -> RelayOutcome {
        if let Some(reason) = self.screen(message) {
            return RelayOutcome::Dropped(reason);
        }

        let Some(group) = self.directory.group_of(message.channel_id) else {
            return RelayOutcome::Dropped(DropReason::NotAWormholeChannel);
        };

        let destinations = self.directory.members_except(&group, message.channel_id);
        if destinations.is_empty() {
            return RelayOutcome::Dropped(DropReason::NoDestinations);
        }

        let origin = OriginKey::new(message.channel_id, message.message_id);
        let mut entry = self.correlations.entry(origin).await;

        if entry.is_deleted() {
            return RelayOutcome::Dropped(DropReason::AlreadyDeleted);
        }
        if entry.get().is_some() {
            return RelayOutcome::Dropped(DropReason::AlreadyRelayed);
        }

        let mut source = InboundMessage {
            files: Vec::new(),
            ..message.clone()
        };
        if let Some(content) = entry.take_deferred_edit() {
            tracing::debug!(
                "Relaying message {} from channel {} with content of an earlier edit",
                message.message_id,
                message.channel_id
            );
            source.content = content;
        }

        let label = self.identity.render(&source.guild);
        let parts = render(&label, &source)
            .into_messages(&message.files, &message.standard_stickers());

        let results = join_all(destinations.into_iter().map(|channel_id| {
            let parts = &parts;
            async move { (channel_id, send_parts(dispatcher, channel_id, parts).await) }
        }))
        .await;

        let mut delivered = HashMap::with_capacity(results.len());
        let mut failed = 0;
        for (channel_id, result) in results {
            match result {
                Ok(message_ids) => {
                    delivered.insert(channel_id, message_ids);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        "Failed to relay message {} from channel {} to channel {}: {}",
                        message.message_id,
                        message.channel_id,
                        channel_id,
                        e
                    );
                }
            }
        }

        if delivered.is_empty() {
            tracing::warn!(
                "Message {} from channel {} could not be delivered to any of {} channels in group {}",
                message.message_id,
                message.channel_id,
                failed,
                group.name
            );
            return RelayOutcome::Relayed {
                delivered: 0,
                failed,
            };
        }

        let count = delivered.len();
        entry.put(RelayedMessage {
            origin,
            source,
            destinations: delivered,
        });
        drop(entry);

        let pruned = self.correlations.enforce_capacity();
        if pruned > 0 {
            tracing::debug!("Pruned {} correlations over capacity", pruned);
        }

        RelayOutcome::Relayed {
            delivered: count,
            failed,
        }
    }
}

/// Posts the parts of one copy in order.
///
/// The copy fails only when its first part fails. A later failure keeps the parts
/// already posted so edits and deletes still reach them.
async fn send_parts(
    dispatcher: &dyn Dispatcher,
    channel_id: ChannelId,
    parts: &[OutboundMessage],
) -> Result<Vec<MessageId>, DispatchError> {
    let mut message_ids = Vec::with_capacity(parts.len());

    for part in parts {
        match dispatcher.send(channel_id, part).await {
            Ok(message_id) => message_ids.push(message_id),
            Err(e) if message_ids.is_empty() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    "Posted {} of {} parts to channel {}: {}",
                    message_ids.len(),
                    parts.len(),
                    channel_id,
                    e
                );
                break;
            }
        }
    }

    Ok(message_ids)
}
