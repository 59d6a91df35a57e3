//! Wormhole channel factory for creating test channel memberships.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test wormhole channels with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let channel = WormholeChannelFactory::new(&db, group.id)
///     .guild_id("111111111")
///     .channel_id("222222222")
///     .build()
///     .await?;
/// ```
pub struct WormholeChannelFactory<'a> {
    db: &'a DatabaseConnection,
    group_id: i32,
    guild_id: String,
    channel_id: String,
}

impl<'a> WormholeChannelFactory<'a> {
    /// Creates a new WormholeChannelFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: unique auto-incremented snowflake
    /// - channel_id: unique auto-incremented snowflake
    pub fn new(db: &'a DatabaseConnection, group_id: i32) -> Self {
        Self {
            db,
            group_id,
            guild_id: (1_000_000 + next_id()).to_string(),
            channel_id: (2_000_000 + next_id()).to_string(),
        }
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Builds and inserts the channel entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::wormhole_channel::Model)` - Created channel entity
    /// - `Err(DbErr)` - Database error during insert, including a duplicate channel_id
    pub async fn build(self) -> Result<entity::wormhole_channel::Model, DbErr> {
        entity::wormhole_channel::ActiveModel {
            id: ActiveValue::NotSet,
            group_id: ActiveValue::Set(self.group_id),
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a wormhole channel in the given group with default values.
pub async fn create_channel(
    db: &DatabaseConnection,
    group_id: i32,
) -> Result<entity::wormhole_channel::Model, DbErr> {
    WormholeChannelFactory::new(db, group_id).build().await
}
