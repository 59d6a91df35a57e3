mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use crate::{
    bot::start::init_bot, config::Config, error::AppError, scheduler::maintenance,
    state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let state = BotState::new(&config, db);
    let mut client = init_bot(&config, state.clone()).await?;

    // Start maintenance scheduler
    let scheduler_http = client.http.clone();
    tokio::spawn(async move {
        if let Err(e) = maintenance::start_scheduler(state, scheduler_http).await {
            tracing::error!("Maintenance scheduler error: {}", e);
        }
    });

    tracing::info!("Starting Discord bot...");

    // Blocks until the gateway connection shuts down
    client.start().await?;

    Ok(())
}
