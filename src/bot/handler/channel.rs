//! Channel event handler for wormhole channels removed from Discord.

use serenity::all::{Context, GuildChannel, Message};

use crate::{service::group::WormholeGroupService, state::BotState};

/// Handles the channel_delete event when a channel is deleted from a guild.
///
/// A deleted wormhole channel is removed from its group so the relay stops trying to
/// deliver to it. Other channels are ignored.
///
/// # Arguments
/// - `state` - Shared relay state
/// - `_ctx` - Discord context (unused, required by event handler signature)
/// - `channel` - The deleted guild channel
/// - `_messages` - Cached messages of the channel (unused)
pub async fn handle_channel_delete(
    state: &BotState,
    _ctx: Context,
    channel: GuildChannel,
    _messages: Option<Vec<Message>>,
) {
    if !state.directory.is_wormhole_channel(channel.id) {
        return;
    }

    match WormholeGroupService::new(&state.db, &state.directory)
        .remove_channel(channel.id.get())
        .await
    {
        Ok(_) => tracing::info!(
            "Removed deleted channel {} of guild {} from its wormhole group",
            channel.name,
            channel.guild_id
        ),
        Err(e) => tracing::error!(
            "Failed to remove deleted channel {} from its wormhole group: {:?}",
            channel.id,
            e
        ),
    }
}
