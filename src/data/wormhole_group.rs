//! Wormhole group data repository for database operations.
//!
//! This module provides the `WormholeGroupRepository` for managing wormhole groups.
//! Groups are always returned together with their member channels since every caller
//! (directory reload, management listing) needs both.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::group::{CreateWormholeGroupParam, WormholeGroup},
};

/// Repository providing database operations for wormhole group management.
pub struct WormholeGroupRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WormholeGroupRepository<'a> {
    /// Creates a new WormholeGroupRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new, empty wormhole group.
    ///
    /// # Arguments
    /// - `param` - Group name
    ///
    /// # Returns
    /// - `Ok(WormholeGroup)` - The created group without channels
    /// - `Err(AppError::DbErr)` - Database error, including a duplicate name
    pub async fn create(&self, param: CreateWormholeGroupParam) -> Result<WormholeGroup, AppError> {
        let entity = entity::wormhole_group::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(param.name),
            slowmode: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        WormholeGroup::from_entity(entity, Vec::new())
    }

    /// Finds a group by ID, including its channels.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<WormholeGroup>, AppError> {
        let Some(group) = entity::prelude::WormholeGroup::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        self.with_channels(group).await.map(Some)
    }

    /// Finds a group by its unique name, including its channels.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<WormholeGroup>, AppError> {
        let Some(group) = entity::prelude::WormholeGroup::find()
            .filter(entity::wormhole_group::Column::Name.eq(name))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        self.with_channels(group).await.map(Some)
    }

    /// Gets every group with its channels, ordered by group ID.
    ///
    /// # Returns
    /// - `Ok(Vec<WormholeGroup>)` - All configured groups
    /// - `Err(AppError)` - Database error or an unparsable stored ID
    pub async fn get_all(&self) -> Result<Vec<WormholeGroup>, AppError> {
        let rows = entity::prelude::WormholeGroup::find()
            .order_by_asc(entity::wormhole_group::Column::Id)
            .find_with_related(entity::prelude::WormholeChannel)
            .all(self.db)
            .await?;

        rows.into_iter()
            .map(|(group, channels)| WormholeGroup::from_entity(group, channels))
            .collect()
    }

    /// Sets the slow mode stored for a group.
    ///
    /// # Arguments
    /// - `id` - Group ID
    /// - `seconds` - Slow mode delay in seconds
    ///
    /// # Returns
    /// - `Ok(Some(WormholeGroup))` - The updated group
    /// - `Ok(None)` - No group with this ID
    pub async fn set_slowmode(
        &self,
        id: i32,
        seconds: u16,
    ) -> Result<Option<WormholeGroup>, AppError> {
        let Some(group) = entity::prelude::WormholeGroup::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::wormhole_group::ActiveModel = group.into();
        active.slowmode = ActiveValue::Set(i32::from(seconds));
        let updated = active.update(self.db).await?;

        self.with_channels(updated).await.map(Some)
    }

    /// Deletes a group and all of its channel memberships.
    ///
    /// # Returns
    /// - `Ok(true)` - Group deleted
    /// - `Ok(false)` - No group with this ID
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        entity::prelude::WormholeChannel::delete_many()
            .filter(entity::wormhole_channel::Column::GroupId.eq(id))
            .exec(self.db)
            .await?;

        let result = entity::prelude::WormholeGroup::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn with_channels(
        &self,
        group: entity::wormhole_group::Model,
    ) -> Result<WormholeGroup, AppError> {
        let channels = group
            .find_related(entity::prelude::WormholeChannel)
            .all(self.db)
            .await?;

        WormholeGroup::from_entity(group, channels)
    }
}
