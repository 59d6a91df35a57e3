//! Application command handlers.

use serenity::all::{CommandInteraction, Context, EditInteractionResponse, Interaction};

use crate::{
    bot::command::{WormholeCommand, COMMAND_NAME},
    error::AppError,
    service::group::WormholeGroupService,
    state::BotState,
};

/// Handles an interaction, answering `/wormhole` invocations.
///
/// The reply is ephemeral. It is deferred first since applying slow mode to a large
/// group takes longer than Discord's three second window.
pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };
    if command.data.name != COMMAND_NAME {
        return;
    }

    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::warn!("Failed to acknowledge /{} command: {}", COMMAND_NAME, e);
        return;
    }

    let reply = match run_command(state, &ctx, &command).await {
        Ok(reply) => reply,
        Err(AppError::BadRequest(message) | AppError::NotFound(message)) => message,
        Err(e) => {
            tracing::error!(
                "Failed to run /{} command for user {}: {}",
                COMMAND_NAME,
                command.user.id,
                e
            );
            "Something went wrong, the error was logged.".to_string()
        }
    };

    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(reply))
        .await
    {
        tracing::warn!("Failed to answer /{} command: {}", COMMAND_NAME, e);
    }
}

async fn run_command(
    state: &BotState,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<String, AppError> {
    let Some(guild_id) = command.guild_id else {
        return Err(AppError::BadRequest(
            "Wormhole commands only work in guilds".to_string(),
        ));
    };

    let parsed = WormholeCommand::parse(&command.data.options)?;
    tracing::info!(
        "User {} in guild {} ran /{} {:?}",
        command.user.id,
        guild_id,
        COMMAND_NAME,
        parsed
    );

    let service = WormholeGroupService::new(&state.db, &state.directory);
    parsed.execute(&service, &ctx.http, guild_id).await
}
