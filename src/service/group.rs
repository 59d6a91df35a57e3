//! Wormhole group management.
//!
//! This module provides the `WormholeGroupService` used by the `/wormhole` command to
//! create groups, register and unregister channels and configure slow mode. Every
//! mutation reloads the group directory so the relay picks it up without a restart.

use sea_orm::DatabaseConnection;
use serenity::{
    all::{ChannelId, EditChannel},
    http::Http,
};

use crate::{
    data::{wormhole_channel::WormholeChannelRepository, wormhole_group::WormholeGroupRepository},
    error::AppError,
    model::group::{AddWormholeChannelParam, CreateWormholeGroupParam, WormholeChannel, WormholeGroup},
    service::directory::GroupDirectory,
};

/// Longest slow mode Discord accepts, in seconds (6 hours).
pub const MAX_SLOWMODE_SECONDS: i64 = 21_600;

/// Result of applying slow mode to the channels of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlowmodeReport {
    pub applied: Vec<ChannelId>,
    /// Channels the bot could not edit, typically for missing Manage Channels permission.
    pub failed: Vec<ChannelId>,
}

/// Service providing management operations on wormhole groups.
pub struct WormholeGroupService<'a> {
    db: &'a DatabaseConnection,
    directory: &'a GroupDirectory,
}

impl<'a> WormholeGroupService<'a> {
    /// Creates a new WormholeGroupService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `directory` - Directory reloaded after every mutation
    pub fn new(db: &'a DatabaseConnection, directory: &'a GroupDirectory) -> Self {
        Self { db, directory }
    }

    /// Creates a new, empty wormhole group.
    ///
    /// # Arguments
    /// - `name` - Group name, surrounding whitespace is ignored
    ///
    /// # Returns
    /// - `Ok(WormholeGroup)` - The created group
    /// - `Err(AppError::BadRequest)` - Empty name or a group with this name already exists
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create_group(&self, name: &str) -> Result<WormholeGroup, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest(
                "Wormhole group name cannot be empty".to_string(),
            ));
        }

        let repo = WormholeGroupRepository::new(self.db);
        if repo.find_by_name(name).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "Wormhole group {} already exists",
                name
            )));
        }

        let group = repo
            .create(CreateWormholeGroupParam {
                name: name.to_string(),
            })
            .await?;

        tracing::info!("Created wormhole group {} ({})", group.name, group.id);

        Ok(group)
    }

    /// Deletes a group together with its channel memberships.
    ///
    /// # Returns
    /// - `Ok(())` - Group deleted
    /// - `Err(AppError::NotFound)` - No group with this ID
    pub async fn delete_group(&self, group_id: i32) -> Result<(), AppError> {
        if !WormholeGroupRepository::new(self.db).delete(group_id).await? {
            return Err(AppError::NotFound(format!(
                "Wormhole group {} not found",
                group_id
            )));
        }

        tracing::info!("Deleted wormhole group {}", group_id);
        self.directory.reload(self.db).await?;

        Ok(())
    }

    /// Registers a channel in a group.
    ///
    /// A channel can be a member of at most one group.
    ///
    /// # Arguments
    /// - `param` - Group ID, guild ID and channel ID
    ///
    /// # Returns
    /// - `Ok(WormholeChannel)` - The new membership
    /// - `Err(AppError::NotFound)` - No group with this ID
    /// - `Err(AppError::BadRequest)` - The channel already belongs to a group
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn add_channel(
        &self,
        param: AddWormholeChannelParam,
    ) -> Result<WormholeChannel, AppError> {
        let Some(group) = WormholeGroupRepository::new(self.db)
            .find_by_id(param.group_id)
            .await?
        else {
            return Err(AppError::NotFound(format!(
                "Wormhole group {} not found",
                param.group_id
            )));
        };

        let channel_repo = WormholeChannelRepository::new(self.db);
        if let Some(existing) = channel_repo.find_by_channel_id(param.channel_id).await? {
            return Err(AppError::BadRequest(format!(
                "Channel {} is already part of wormhole group {}",
                param.channel_id, existing.group_id
            )));
        }

        let channel = channel_repo.add(param).await?;

        tracing::info!(
            "Added channel {} of guild {} to wormhole group {}",
            channel.channel_id,
            channel.guild_id,
            group.name
        );
        self.directory.reload(self.db).await?;

        Ok(channel)
    }

    /// Removes a channel from its group.
    ///
    /// # Returns
    /// - `Ok(true)` - The channel was removed
    /// - `Ok(false)` - The channel was not a wormhole channel
    pub async fn remove_channel(&self, channel_id: u64) -> Result<bool, AppError> {
        let removed = WormholeChannelRepository::new(self.db)
            .remove(channel_id)
            .await?;

        if removed {
            tracing::info!("Removed channel {} from its wormhole group", channel_id);
            self.directory.reload(self.db).await?;
        }

        Ok(removed)
    }

    /// Lists every group with its channels.
    pub async fn list_groups(&self) -> Result<Vec<WormholeGroup>, AppError> {
        WormholeGroupRepository::new(self.db).get_all().await
    }

    /// Finds a group by name.
    ///
    /// # Returns
    /// - `Ok(WormholeGroup)` - The group, channels included
    /// - `Err(AppError::NotFound)` - No group with this name
    pub async fn group_by_name(&self, name: &str) -> Result<WormholeGroup, AppError> {
        let name = name.trim();

        self.list_groups()
            .await?
            .into_iter()
            .find(|group| group.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Wormhole group {} not found", name)))
    }

    /// Finds the group a channel belongs to.
    pub async fn group_of_channel(
        &self,
        channel_id: ChannelId,
    ) -> Result<Option<WormholeGroup>, AppError> {
        Ok(self
            .list_groups()
            .await?
            .into_iter()
            .find(|group| group.contains(channel_id)))
    }

    /// Stores the slow mode of a group.
    ///
    /// Only persists the value, `apply_slowmode` pushes it to Discord.
    ///
    /// # Arguments
    /// - `group_id` - Group ID
    /// - `seconds` - Delay between messages, 0 disables slow mode
    ///
    /// # Returns
    /// - `Ok(WormholeGroup)` - The updated group
    /// - `Err(AppError::BadRequest)` - Delay outside 0 to 21600 seconds
    /// - `Err(AppError::NotFound)` - No group with this ID
    pub async fn set_slowmode(&self, group_id: i32, seconds: i64) -> Result<WormholeGroup, AppError> {
        let seconds = u16::try_from(seconds)
            .ok()
            .filter(|s| i64::from(*s) <= MAX_SLOWMODE_SECONDS)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Slow mode must be between 0 and {} seconds, got {}",
                    MAX_SLOWMODE_SECONDS, seconds
                ))
            })?;

        let group = WormholeGroupRepository::new(self.db)
            .set_slowmode(group_id, seconds)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Wormhole group {} not found", group_id)))?;

        self.directory.reload(self.db).await?;

        Ok(group)
    }

    /// Sets the group's slow mode on every member channel.
    ///
    /// Continues with the remaining channels when one of them cannot be edited.
    ///
    /// # Arguments
    /// - `http` - Discord HTTP client
    /// - `group` - Group whose stored slow mode is applied
    ///
    /// # Returns
    /// - `SlowmodeReport` - Channels updated and channels that failed
    pub async fn apply_slowmode(&self, http: &Http, group: &WormholeGroup) -> SlowmodeReport {
        self.apply_slowmode_to(http, group, group.channel_ids()).await
    }

    /// Sets the group's slow mode on the given channels only.
    pub async fn apply_slowmode_to(
        &self,
        http: &Http,
        group: &WormholeGroup,
        channels: impl IntoIterator<Item = ChannelId>,
    ) -> SlowmodeReport {
        let mut report = SlowmodeReport::default();

        for channel_id in channels {
            let edit = EditChannel::new().rate_limit_per_user(group.slowmode);

            match channel_id.edit(http, edit).await {
                Ok(_) => report.applied.push(channel_id),
                Err(e) => {
                    tracing::warn!(
                        "Failed to set slow mode of {}s on channel {} in group {}: {}",
                        group.slowmode,
                        channel_id,
                        group.name,
                        e
                    );
                    report.failed.push(channel_id);
                }
            }
        }

        report
    }

    /// Re-applies the stored slow mode of every group that has one.
    ///
    /// Run when the bot connects so channels edited while it was offline are corrected.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of channels updated
    /// - `Err(AppError::DbErr)` - Groups could not be loaded
    pub async fn restore_slowmode(&self, http: &Http) -> Result<usize, AppError> {
        let mut applied = 0;

        for group in self.list_groups().await? {
            if group.slowmode == 0 {
                continue;
            }

            let report = self.apply_slowmode(http, &group).await;
            applied += report.applied.len();
        }

        Ok(applied)
    }
}
