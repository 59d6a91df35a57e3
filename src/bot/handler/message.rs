//! Message event handlers feeding the relay engine.
//!
//! Gateway payloads are converted to inbound relay events here. Events from channels
//! outside every wormhole group return early without touching the REST API, since
//! the bot receives messages from every channel it can see.

use std::sync::Arc;

use futures::future::join_all;
use serenity::all::{
    Attachment, ChannelId, Context, GuildId, Message, MessageId, MessageType,
    MessageUpdateEvent, StickerItem, StickerType,
};

use crate::{
    model::{
        guild::GuildIdentity,
        message::{FileUpload, InboundDelete, InboundEdit, InboundMessage, StickerRef},
        relay::RelayOutcome,
    },
    state::BotState,
};

/// Largest attachment uploaded again with the copies. Larger ones are linked.
const MAX_UPLOAD_BYTES: u32 = 10 * 1024 * 1024;

/// Handles a new message in any channel the bot can see.
///
/// # Arguments
/// - `state` - Shared relay state
/// - `ctx` - Discord context providing the cache and HTTP client
/// - `message` - The new message
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    let Some(guild_id) = message.guild_id else {
        return;
    };

    // Pins, joins, boosts and thread notices are not user content
    if !matches!(message.kind, MessageType::Regular | MessageType::InlineReply) {
        return;
    }

    if !state.directory.is_wormhole_channel(message.channel_id) {
        return;
    }

    let guild = GuildIdentity::new(guild_id, guild_name(&ctx, guild_id).await);
    let relay_user_id = ctx.cache.current_user().id;
    let mut inbound = InboundMessage::from_message(&message, guild, relay_user_id);
    if !inbound.author.is_relay {
        inbound.attach_downloads(download_attachments(&message.attachments).await);
        inbound.stickers = resolve_stickers(&ctx, &message.sticker_items).await;
    }

    let dispatcher = state.dispatcher(ctx.http.clone());
    let outcome = state.relay.relay_message(&dispatcher, &inbound).await;

    match outcome {
        RelayOutcome::Relayed { delivered, failed } => tracing::debug!(
            "Relayed message {} from channel {}: {} delivered, {} failed",
            message.id,
            message.channel_id,
            delivered,
            failed
        ),
        RelayOutcome::Dropped(reason) => tracing::debug!(
            "Dropped message {} from channel {}: {:?}",
            message.id,
            message.channel_id,
            reason
        ),
        other => tracing::debug!("Unexpected outcome for message {}: {:?}", message.id, other),
    }
}

/// Handles an edited message.
///
/// Updates that do not carry content, such as Discord adding link previews, are
/// ignored, as are edits of the bot's own copies.
pub async fn handle_message_update(state: &BotState, ctx: Context, event: MessageUpdateEvent) {
    let relay_user_id = ctx.cache.current_user().id;
    if event
        .author
        .as_ref()
        .is_some_and(|author| author.id == relay_user_id)
    {
        return;
    }

    let Some(edit) = InboundEdit::from_update_event(&event) else {
        return;
    };

    let dispatcher = state.dispatcher(ctx.http.clone());
    let outcome = state.relay.relay_edit(&dispatcher, &edit).await;

    if let RelayOutcome::Edited { updated, failed } = outcome {
        tracing::debug!(
            "Propagated edit of message {}: {} updated, {} failed",
            edit.message_id,
            updated,
            failed
        );
    }
}

/// Handles one or more deleted messages of a channel.
///
/// Deletes are propagated concurrently, each under its own origin lock.
pub async fn handle_message_delete(
    state: &BotState,
    ctx: Context,
    channel_id: ChannelId,
    message_ids: Vec<MessageId>,
) {
    let dispatcher = state.dispatcher(ctx.http.clone());

    let outcomes = futures::future::join_all(message_ids.into_iter().map(|message_id| {
        let dispatcher = &dispatcher;
        async move {
            let outcome = state
                .relay
                .relay_delete(
                    dispatcher,
                    InboundDelete {
                        channel_id,
                        message_id,
                    },
                )
                .await;
            (message_id, outcome)
        }
    }))
    .await;

    for (message_id, outcome) in outcomes {
        if let RelayOutcome::Deleted { removed, failed } = outcome {
            tracing::debug!(
                "Propagated delete of message {}: {} removed, {} failed",
                message_id,
                removed,
                failed
            );
        }
    }
}

/// Downloads the attachments small enough to be uploaded again.
///
/// # Returns
/// - `Vec<Option<FileUpload>>` - One slot per attachment, `None` where it stays a link
async fn download_attachments(attachments: &[Attachment]) -> Vec<Option<FileUpload>> {
    join_all(attachments.iter().map(|attachment| async move {
        if attachment.size > MAX_UPLOAD_BYTES {
            return None;
        }

        match attachment.download().await {
            Ok(data) => Some(FileUpload {
                filename: attachment.filename.clone(),
                data: Arc::from(data),
            }),
            Err(e) => {
                tracing::warn!(
                    "Failed to download attachment {}, relaying it as a link: {}",
                    attachment.filename,
                    e
                );
                None
            }
        }
    }))
    .await
}

/// Sorts stickers into standard ones, which any bot can send, and guild ones.
///
/// A sticker whose kind cannot be fetched is treated as a guild sticker and linked.
async fn resolve_stickers(ctx: &Context, items: &[StickerItem]) -> Vec<StickerRef> {
    let resolved = join_all(items.iter().map(|item| async move {
        match item.to_sticker(&ctx.http).await {
            Ok(sticker) if sticker.kind == StickerType::Standard => {
                return Some(StickerRef::Standard(item.id));
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Failed to fetch sticker {}: {}", item.id, e),
        }

        item.image_url().map(|url| StickerRef::Custom { url })
    }))
    .await;

    resolved.into_iter().flatten().collect()
}

/// Resolves a guild's display name from the cache, falling back to the REST API.
async fn guild_name(ctx: &Context, guild_id: GuildId) -> String {
    if let Some(name) = guild_id.name(&ctx.cache) {
        return name;
    }

    match guild_id.to_partial_guild(&ctx.http).await {
        Ok(guild) => guild.name,
        Err(e) => {
            tracing::warn!("Failed to fetch name of guild {}: {}", guild_id, e);
            guild_id.to_string()
        }
    }
}
