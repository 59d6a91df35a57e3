use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::Config, error::AppError, state::BotState};

/// Builds the Discord bot client without connecting it.
///
/// The client's HTTP handle is available right away so the maintenance scheduler can
/// share it. Call `Client::start` to connect to the gateway.
///
/// # Arguments
/// - `config` - Application configuration with the bot token
/// - `state` - Shared relay state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(config: &Config, state: BotState) -> Result<Client, AppError> {
    // MESSAGE_CONTENT is privileged, without it every relayed message would be empty
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(state))
        .await?;

    Ok(client)
}
