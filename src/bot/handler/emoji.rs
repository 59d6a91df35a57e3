//! Emoji event handler keeping origin badges current.

use std::collections::HashMap;

use serenity::all::{Context, Emoji, EmojiId, GuildId};

use crate::{service::identity::EmojiAsset, state::BotState};

/// Handles a change of a guild's custom emojis.
///
/// Only the configured emoji guild matters. Discord sends the complete emoji set, so
/// the cache is replaced without another API call.
///
/// # Arguments
/// - `state` - Shared relay state
/// - `_ctx` - Discord context (unused, required by event handler signature)
/// - `guild_id` - Guild whose emojis changed
/// - `current_state` - All emojis of the guild after the change
pub async fn handle_guild_emojis_update(
    state: &BotState,
    _ctx: Context,
    guild_id: GuildId,
    current_state: HashMap<EmojiId, Emoji>,
) {
    if state.emoji_guild_id != Some(guild_id) {
        return;
    }

    let count = state
        .identity
        .replace_emojis(current_state.values().map(EmojiAsset::from).collect());

    tracing::info!("Emoji guild {} now provides {} emojis", guild_id, count);
}
