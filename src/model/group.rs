//! Domain models for wormhole groups.
//!
//! A wormhole group is a named set of channels, possibly spread over many guilds,
//! whose messages are mirrored to each other. A channel belongs to at most one group.

use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId};

use crate::{error::AppError, util::parse::parse_u64_from_string};

/// A channel registered as a member of a wormhole group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormholeChannel {
    /// ID of the group this channel belongs to.
    pub group_id: i32,
    /// Guild owning the channel.
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

impl WormholeChannel {
    /// Converts an entity model to a wormhole channel domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(WormholeChannel)` - The converted domain model
    /// - `Err(AppError::InternalErr)` - Stored guild or channel ID is not a valid snowflake
    pub fn from_entity(entity: entity::wormhole_channel::Model) -> Result<Self, AppError> {
        Ok(Self {
            group_id: entity.group_id,
            guild_id: GuildId::new(parse_u64_from_string(entity.guild_id)?),
            channel_id: ChannelId::new(parse_u64_from_string(entity.channel_id)?),
        })
    }
}

/// A wormhole group with its member channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormholeGroup {
    pub id: i32,
    /// Unique name of the group.
    pub name: String,
    /// Slow mode in seconds applied to every member channel, 0 when disabled.
    pub slowmode: u16,
    pub channels: Vec<WormholeChannel>,
    pub created_at: DateTime<Utc>,
}

impl WormholeGroup {
    /// Converts a group entity and its channel entities to a domain model.
    ///
    /// # Arguments
    /// - `group` - The group entity model
    /// - `channels` - Channel entity models belonging to the group
    ///
    /// # Returns
    /// - `Ok(WormholeGroup)` - The converted domain model
    /// - `Err(AppError::InternalErr)` - A stored channel ID failed to parse
    pub fn from_entity(
        group: entity::wormhole_group::Model,
        channels: Vec<entity::wormhole_channel::Model>,
    ) -> Result<Self, AppError> {
        let channels = channels
            .into_iter()
            .map(WormholeChannel::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: group.id,
            name: group.name,
            slowmode: u16::try_from(group.slowmode.max(0)).unwrap_or(u16::MAX),
            channels,
            created_at: group.created_at,
        })
    }

    pub fn contains(&self, channel_id: ChannelId) -> bool {
        self.channels.iter().any(|c| c.channel_id == channel_id)
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.iter().map(|c| c.channel_id)
    }
}

/// Parameters for creating a new wormhole group.
#[derive(Debug, Clone)]
pub struct CreateWormholeGroupParam {
    pub name: String,
}

/// Parameters for registering a channel in a wormhole group.
#[derive(Debug, Clone)]
pub struct AddWormholeChannelParam {
    pub group_id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
}
