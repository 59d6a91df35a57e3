use super::*;

/// Tests finding the membership of a registered channel.
///
/// Expected: Ok(Some) with the owning group
#[tokio::test]
async fn finds_registered_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let channel = factory::create_channel(db, group.id).await?;
    let channel_id: u64 = channel.channel_id.parse().unwrap();

    let found = WormholeChannelRepository::new(db)
        .find_by_channel_id(channel_id)
        .await?;

    assert_eq!(found.map(|c| c.group_id), Some(group.id));

    Ok(())
}

/// Tests looking up a channel that is not part of any wormhole.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unregistered_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let found = WormholeChannelRepository::new(db)
        .find_by_channel_id(123)
        .await?;

    assert!(found.is_none());

    Ok(())
}

/// Tests that a corrupt stored ID surfaces as an internal error.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_unparsable_guild_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    factory::wormhole_channel::WormholeChannelFactory::new(db, group.id)
        .guild_id("not-a-snowflake")
        .channel_id("555")
        .build()
        .await?;

    let result = WormholeChannelRepository::new(db)
        .find_by_channel_id(555)
        .await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
