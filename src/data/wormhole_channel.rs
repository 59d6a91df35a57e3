//! Wormhole channel data repository for database operations.
//!
//! Channel membership rows link a Discord channel to exactly one wormhole group. The
//! unique index on `channel_id` backs the at-most-one-group invariant.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

use crate::{
    error::AppError,
    model::group::{AddWormholeChannelParam, WormholeChannel},
};

/// Repository providing database operations for wormhole channel membership.
pub struct WormholeChannelRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WormholeChannelRepository<'a> {
    /// Creates a new WormholeChannelRepository instance.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a channel as a member of a group.
    ///
    /// # Arguments
    /// - `param` - Group ID, guild ID and channel ID
    ///
    /// # Returns
    /// - `Ok(WormholeChannel)` - The created membership
    /// - `Err(AppError::DbErr)` - Database error, including the channel already being
    ///   a member of any group
    pub async fn add(&self, param: AddWormholeChannelParam) -> Result<WormholeChannel, AppError> {
        let entity = entity::wormhole_channel::ActiveModel {
            id: ActiveValue::NotSet,
            group_id: ActiveValue::Set(param.group_id),
            guild_id: ActiveValue::Set(param.guild_id.to_string()),
            channel_id: ActiveValue::Set(param.channel_id.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        WormholeChannel::from_entity(entity)
    }

    /// Finds the membership of a channel.
    ///
    /// # Returns
    /// - `Ok(Some(WormholeChannel))` - The channel is a member of a group
    /// - `Ok(None)` - The channel is not a wormhole channel
    pub async fn find_by_channel_id(
        &self,
        channel_id: u64,
    ) -> Result<Option<WormholeChannel>, AppError> {
        let entity = entity::prelude::WormholeChannel::find()
            .filter(entity::wormhole_channel::Column::ChannelId.eq(channel_id.to_string()))
            .one(self.db)
            .await?;

        entity.map(WormholeChannel::from_entity).transpose()
    }

    /// Gets all channels of a group.
    pub async fn get_by_group_id(&self, group_id: i32) -> Result<Vec<WormholeChannel>, AppError> {
        entity::prelude::WormholeChannel::find()
            .filter(entity::wormhole_channel::Column::GroupId.eq(group_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(WormholeChannel::from_entity)
            .collect()
    }

    /// Removes a channel from whichever group it belongs to.
    ///
    /// # Returns
    /// - `Ok(true)` - The channel was a member and has been removed
    /// - `Ok(false)` - The channel was not a wormhole channel
    pub async fn remove(&self, channel_id: u64) -> Result<bool, AppError> {
        let result = entity::prelude::WormholeChannel::delete_many()
            .filter(entity::wormhole_channel::Column::ChannelId.eq(channel_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
