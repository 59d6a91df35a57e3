use super::*;

/// Tests that every group is returned with its own channels.
///
/// Expected: Ok with two groups carrying their respective channels
#[tokio::test]
async fn returns_groups_with_channels() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (first, first_channels) = factory::helpers::create_group_with_channels(db, 3).await?;
    let (second, second_channels) = factory::helpers::create_group_with_channels(db, 1).await?;

    let groups = WormholeGroupRepository::new(db).get_all().await?;

    assert_eq!(groups.len(), 2);

    let loaded_first = groups.iter().find(|g| g.id == first.id).unwrap();
    assert_eq!(loaded_first.channels.len(), 3);
    for channel in &first_channels {
        let id = ChannelId::new(channel.channel_id.parse().unwrap());
        assert!(loaded_first.contains(id));
    }

    let loaded_second = groups.iter().find(|g| g.id == second.id).unwrap();
    assert_eq!(loaded_second.channels.len(), 1);
    assert_eq!(
        loaded_second.channels[0].channel_id,
        ChannelId::new(second_channels[0].channel_id.parse().unwrap())
    );

    Ok(())
}

/// Tests that an empty database yields no groups.
///
/// Expected: Ok with empty Vec
#[tokio::test]
async fn returns_empty_without_groups() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let groups = WormholeGroupRepository::new(db).get_all().await?;

    assert!(groups.is_empty());

    Ok(())
}
