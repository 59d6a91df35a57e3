use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::identity::GuildEmojiSource, state::BotState};

/// Starts the maintenance scheduler
///
/// Runs two jobs:
/// - Every minute: prune expired correlations and reload wormhole groups, picking up
///   changes made to the database by other processes
/// - Every 10 minutes: refresh the emoji cache, in case an emoji update event was missed
///
/// # Arguments
/// - `state`: Shared relay state
/// - `discord_http`: Discord HTTP client for fetching emojis
pub async fn start_scheduler(state: BotState, discord_http: Arc<Http>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_state = state.clone();
    let maintenance_job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let state = job_state.clone();

        Box::pin(async move {
            if let Err(e) = run_maintenance(&state).await {
                tracing::error!("Error running relay maintenance: {}", e);
            }
        })
    })?;

    let emoji_job = Job::new_async("0 */10 * * * *", move |_uuid, _lock| {
        let state = state.clone();
        let http = discord_http.clone();

        Box::pin(async move {
            if let Err(e) = refresh_emojis(&state, http).await {
                tracing::warn!("Error refreshing emojis: {}", e);
            }
        })
    })?;

    scheduler.add(maintenance_job).await?;
    scheduler.add(emoji_job).await?;
    scheduler.start().await?;

    tracing::info!("Maintenance scheduler started");

    Ok(())
}

/// Prunes correlations and reloads the group directory
async fn run_maintenance(state: &BotState) -> Result<(), AppError> {
    let pruned = state.correlations.prune();
    if pruned > 0 {
        tracing::debug!(
            "Pruned {} correlations, {} remain",
            pruned,
            state.correlations.len()
        );
    }

    state.directory.reload(&state.db).await?;

    Ok(())
}

/// Refreshes the emoji cache from the emoji guild, if one is configured
async fn refresh_emojis(state: &BotState, discord_http: Arc<Http>) -> Result<(), AppError> {
    let Some(guild_id) = state.emoji_guild_id else {
        return Ok(());
    };

    let count = state
        .identity
        .refresh(&GuildEmojiSource::new(discord_http, guild_id))
        .await?;

    tracing::debug!("Refreshed {} emojis from guild {}", count, guild_id);

    Ok(())
}
