//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created entity gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a wormhole group with `channel_count` member channels, each in its own guild.
///
/// # Arguments
/// - `db` - Database connection
/// - `channel_count` - Number of member channels to create
///
/// # Returns
/// - `Ok((group, channels))` - The created group and its channels in creation order
/// - `Err(DbErr)` - Database error during insert
pub async fn create_group_with_channels(
    db: &DatabaseConnection,
    channel_count: usize,
) -> Result<
    (
        entity::wormhole_group::Model,
        Vec<entity::wormhole_channel::Model>,
    ),
    DbErr,
> {
    let group = super::create_group(db).await?;

    let mut channels = Vec::with_capacity(channel_count);
    for _ in 0..channel_count {
        channels.push(super::create_channel(db, group.id).await?);
    }

    Ok((group, channels))
}
