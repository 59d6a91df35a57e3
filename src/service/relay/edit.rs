//! Propagation of edits to relayed copies.

use futures::future::join_all;
use serenity::all::{ChannelId, MessageId};

use crate::{
    error::dispatch::DispatchError,
    model::{
        message::{InboundEdit, OutboundMessage},
        relay::{OriginKey, RelayOutcome},
    },
    service::{dispatcher::Dispatcher, render::render},
};

use super::RelayService;

impl RelayService {
    /// Edits every recorded copy of a message to match its new content.
    ///
    /// The copies are re-rendered with the identity captured when the message was first
    /// relayed. A copy whose new rendition has more parts gets the extra parts posted,
    /// one with fewer parts gets the surplus deleted. A copy whose destination became
    /// unavailable is forgotten so later edits skip it.
    ///
    /// An edit in a wormhole channel that arrives before its message was relayed is
    /// kept, and the relay posts the edited content.
    ///
    /// # Arguments
    /// - `dispatcher` - Dispatcher performing the edits
    /// - `edit` - The edited message
    ///
    /// # Returns
    /// - `RelayOutcome::NotCorrelated` - The message was not relayed (yet) or is no longer tracked
    /// - `RelayOutcome::Edited` - Number of updated and failed copies
    pub async fn relay_edit(&self, dispatcher: &dyn Dispatcher, edit: &InboundEdit) -> RelayOutcome {
        let origin = OriginKey::new(edit.channel_id, edit.message_id);
        let mut entry = self.correlations.entry(origin).await;

        if entry.get().is_none() {
            if self.directory.is_wormhole_channel(edit.channel_id) {
                entry.defer_edit(edit.content.clone());
            }
            return RelayOutcome::NotCorrelated;
        }
        let Some(relayed) = entry.get_mut() else {
            return RelayOutcome::NotCorrelated;
        };

        relayed.source.content = edit.content.clone();

        let label = self.identity.render(&relayed.source.guild);
        let parts = render(&label, &relayed.source).parts;

        let copies: Vec<(ChannelId, Vec<MessageId>)> = relayed
            .destinations
            .iter()
            .map(|(channel_id, message_ids)| (*channel_id, message_ids.clone()))
            .collect();

        let results = join_all(copies.into_iter().map(|(channel_id, message_ids)| {
            let parts = &parts;
            async move {
                let (message_ids, error) =
                    sync_parts(dispatcher, channel_id, &message_ids, parts).await;
                (channel_id, message_ids, error)
            }
        }))
        .await;

        let mut updated = 0;
        let mut failed = 0;
        for (channel_id, message_ids, error) in results {
            let Some(e) = error else {
                updated += 1;
                relayed.destinations.insert(channel_id, message_ids);
                continue;
            };

            failed += 1;
            tracing::warn!(
                "Failed to edit copy of message {} in channel {}: {}",
                edit.message_id,
                channel_id,
                e
            );

            if matches!(e, DispatchError::DestinationUnavailable(_)) {
                relayed.destinations.remove(&channel_id);
            } else {
                relayed.destinations.insert(channel_id, message_ids);
            }
        }

        RelayOutcome::Edited { updated, failed }
    }
}

/// Brings the parts of one copy in line with a new rendition.
///
/// Existing parts are edited in order, missing parts posted and surplus parts deleted.
/// Stops at the first failure.
///
/// # Returns
/// - `Vec<MessageId>` - The parts present in the destination afterwards
/// - `Option<DispatchError>` - The failure that stopped the update, if any
async fn sync_parts(
    dispatcher: &dyn Dispatcher,
    channel_id: ChannelId,
    message_ids: &[MessageId],
    parts: &[String],
) -> (Vec<MessageId>, Option<DispatchError>) {
    let mut present = Vec::with_capacity(parts.len());

    for (index, part) in parts.iter().enumerate() {
        let result = match message_ids.get(index) {
            Some(&message_id) => dispatcher
                .edit(channel_id, message_id, part)
                .await
                .map(|()| message_id),
            None => {
                dispatcher
                    .send(channel_id, &OutboundMessage::text(part.as_str()))
                    .await
            }
        };

        match result {
            Ok(message_id) => present.push(message_id),
            Err(e) => {
                present.extend(message_ids.iter().skip(index));
                return (present, Some(e));
            }
        }
    }

    let mut error = None;
    for &message_id in message_ids.iter().skip(parts.len()) {
        if let Err(e) = dispatcher.delete(channel_id, message_id).await {
            present.push(message_id);
            error.get_or_insert(e);
        }
    }

    (present, error)
}
