use super::*;

/// Tests removing a registered channel.
///
/// Expected: Ok(true) and the channel no longer found
#[tokio::test]
async fn removes_registered_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let channel = factory::create_channel(db, group.id).await?;
    let channel_id: u64 = channel.channel_id.parse().unwrap();
    let repo = WormholeChannelRepository::new(db);

    assert!(repo.remove(channel_id).await?);
    assert!(repo.find_by_channel_id(channel_id).await?.is_none());

    Ok(())
}

/// Tests removing a channel that was never registered.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_unregistered_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    assert!(!WormholeChannelRepository::new(db).remove(777).await?);

    Ok(())
}
