//! In-memory directory of wormhole groups.
//!
//! The relay engine consults the directory for every inbound message, so membership is
//! answered from an immutable snapshot instead of the database. `reload` builds a new
//! snapshot and swaps it in; readers holding the previous one keep a consistent view.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use serenity::all::ChannelId;

use crate::{
    data::wormhole_group::WormholeGroupRepository, error::AppError, model::group::WormholeGroup,
};

#[derive(Default)]
struct DirectorySnapshot {
    by_channel: HashMap<ChannelId, Arc<WormholeGroup>>,
}

impl DirectorySnapshot {
    /// Indexes groups by member channel.
    ///
    /// A channel listed in more than one group stays with the first group and is
    /// removed from the others.
    fn build(groups: Vec<WormholeGroup>) -> Self {
        let mut claimed: HashMap<ChannelId, i32> = HashMap::new();
        let mut snapshot = Self::default();

        for mut group in groups {
            group.channels.retain(|channel| {
                match claimed.get(&channel.channel_id) {
                    Some(owner) => {
                        tracing::warn!(
                            "Channel {} is registered in groups {} and {}, keeping it in {}",
                            channel.channel_id,
                            owner,
                            group.id,
                            owner
                        );
                        false
                    }
                    None => {
                        claimed.insert(channel.channel_id, group.id);
                        true
                    }
                }
            });

            let group = Arc::new(group);
            for channel_id in group.channel_ids() {
                snapshot.by_channel.insert(channel_id, Arc::clone(&group));
            }
        }

        snapshot
    }
}

/// Partitioning of channels into wormhole groups.
pub struct GroupDirectory {
    snapshot: RwLock<Arc<DirectorySnapshot>>,
}

impl Default for GroupDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupDirectory {
    /// Creates an empty directory. Every channel is reported as not a wormhole channel
    /// until the first reload.
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(DirectorySnapshot::default())),
        }
    }

    #[cfg(test)]
    pub fn from_groups(groups: Vec<WormholeGroup>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(DirectorySnapshot::build(groups))),
        }
    }

    fn current(&self) -> Arc<DirectorySnapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Returns the group `channel_id` belongs to, if any.
    pub fn group_of(&self, channel_id: ChannelId) -> Option<Arc<WormholeGroup>> {
        self.current().by_channel.get(&channel_id).cloned()
    }

    /// Returns every member of `group` except `channel_id`.
    pub fn members_except(&self, group: &WormholeGroup, channel_id: ChannelId) -> HashSet<ChannelId> {
        group
            .channel_ids()
            .filter(|member| *member != channel_id)
            .collect()
    }

    pub fn is_wormhole_channel(&self, channel_id: ChannelId) -> bool {
        self.current().by_channel.contains_key(&channel_id)
    }

    /// Swaps in a new set of groups.
    pub fn replace(&self, groups: Vec<WormholeGroup>) {
        let snapshot = Arc::new(DirectorySnapshot::build(groups));
        *self.snapshot.write() = snapshot;
    }

    /// Reloads all groups from the database.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of groups now in the directory
    /// - `Err(AppError)` - Database error, the previous snapshot stays in place
    pub async fn reload(&self, db: &DatabaseConnection) -> Result<usize, AppError> {
        let groups = WormholeGroupRepository::new(db).get_all().await?;
        let count = groups.len();

        self.replace(groups);

        Ok(count)
    }
}
