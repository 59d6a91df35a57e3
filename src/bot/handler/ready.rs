//! Ready event handler for bot initialization.
//!
//! The ready event fires after every successful gateway connection, including
//! reconnects. The relay uses it to load state that may have changed while the bot was
//! offline:
//! - Wormhole groups from the database
//! - Custom emojis of the emoji guild
//! - Slow mode of every wormhole channel
//!
//! It also registers the `/wormhole` command, which replaces any earlier definition.

use serenity::all::{Command, Context, Ready};

use crate::{
    bot::command::{create_command, COMMAND_NAME},
    service::{group::WormholeGroupService, identity::GuildEmojiSource},
    state::BotState,
};

/// Handles the ready event when the bot connects to Discord.
///
/// Each step logs its own failure and the remaining steps still run, so a missing
/// emoji guild never keeps the relay from starting.
///
/// # Arguments
/// - `state` - Shared relay state
/// - `ctx` - Discord context providing the HTTP client
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &BotState, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord in {} guilds",
        ready.user.name,
        ready.guilds.len()
    );

    match state.directory.reload(&state.db).await {
        Ok(count) => tracing::info!("Loaded {} wormhole groups", count),
        Err(e) => tracing::error!("Failed to load wormhole groups: {}", e),
    }

    if let Some(guild_id) = state.emoji_guild_id {
        let source = GuildEmojiSource::new(ctx.http.clone(), guild_id);
        match state.identity.refresh(&source).await {
            Ok(count) => tracing::info!("Loaded {} emojis from guild {}", count, guild_id),
            Err(e) => tracing::warn!("Failed to load emojis from guild {}: {}", guild_id, e),
        }
    } else {
        tracing::info!("No emoji guild configured, origin labels use plain names");
    }

    match Command::set_global_commands(&ctx.http, vec![create_command()]).await {
        Ok(_) => tracing::debug!("Registered /{} command", COMMAND_NAME),
        Err(e) => tracing::error!("Failed to register /{} command: {}", COMMAND_NAME, e),
    }

    match WormholeGroupService::new(&state.db, &state.directory)
        .restore_slowmode(&ctx.http)
        .await
    {
        Ok(count) => tracing::debug!("Restored slow mode on {} channels", count),
        Err(e) => tracing::error!("Failed to restore slow mode: {}", e),
    }
}
