//! Shared state of the running relay.
//!
//! Built once at startup and cloned into the gateway event handler and the maintenance
//! scheduler. Every field is cheap to clone: the database connection is a pool and the
//! relay components are reference counted.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::{all::GuildId, http::Http};

use crate::{
    config::Config,
    service::{
        correlation::{CorrelationStore, RetentionPolicy},
        directory::GroupDirectory,
        dispatcher::{BackoffPolicy, RetryingDispatcher, SerenityDispatcher},
        identity::IdentityResolver,
        relay::{RelayOptions, RelayService},
    },
};

#[derive(Clone)]
pub struct BotState {
    /// Database connection pool holding wormhole groups.
    pub db: DatabaseConnection,
    pub relay: Arc<RelayService>,
    pub directory: Arc<GroupDirectory>,
    pub identity: Arc<IdentityResolver>,
    pub correlations: CorrelationStore,
    /// Retry schedule for every dispatcher handed out by `dispatcher`.
    pub backoff: BackoffPolicy,
    /// Guild whose emojis badge relayed messages, if configured.
    pub emoji_guild_id: Option<GuildId>,
}

impl BotState {
    /// Wires the relay components from configuration.
    ///
    /// The directory starts empty and is filled by the first reload.
    ///
    /// # Arguments
    /// - `config` - Application configuration
    /// - `db` - Database connection with migrations applied
    pub fn new(config: &Config, db: DatabaseConnection) -> Self {
        let directory = Arc::new(GroupDirectory::new());
        let identity = Arc::new(IdentityResolver::new(config.name_separator.clone()));
        let correlations = CorrelationStore::new(RetentionPolicy::from_config(config));

        let relay = Arc::new(RelayService::new(
            Arc::clone(&directory),
            Arc::clone(&identity),
            correlations.clone(),
            RelayOptions::from_config(config),
        ));

        Self {
            db,
            relay,
            directory,
            identity,
            correlations,
            backoff: BackoffPolicy::from_config(config),
            emoji_guild_id: config.emoji_guild_id.filter(|id| *id != 0).map(GuildId::new),
        }
    }

    /// Creates the production dispatcher over the given HTTP client.
    pub fn dispatcher(&self, http: Arc<Http>) -> RetryingDispatcher<SerenityDispatcher> {
        RetryingDispatcher::new(SerenityDispatcher::new(http), self.backoff)
    }
}
