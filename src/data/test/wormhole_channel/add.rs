use super::*;

/// Tests registering a channel in a group.
///
/// Expected: Ok with parsed snowflakes
#[tokio::test]
async fn adds_channel_to_group() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let repo = WormholeChannelRepository::new(db);

    let channel = repo
        .add(AddWormholeChannelParam {
            group_id: group.id,
            guild_id: 111111111,
            channel_id: 222222222,
        })
        .await?;

    assert_eq!(channel.group_id, group.id);
    assert_eq!(channel.guild_id, GuildId::new(111111111));
    assert_eq!(channel.channel_id, ChannelId::new(222222222));

    let members = repo.get_by_group_id(group.id).await?;
    assert_eq!(members, vec![channel]);

    Ok(())
}

/// Tests that a channel cannot join a second group.
///
/// Expected: Err from the unique channel_id index
#[tokio::test]
async fn rejects_channel_in_second_group() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_group(db).await?;
    let second = factory::create_group(db).await?;
    let repo = WormholeChannelRepository::new(db);

    repo.add(AddWormholeChannelParam {
        group_id: first.id,
        guild_id: 1,
        channel_id: 42,
    })
    .await?;

    let result = repo
        .add(AddWormholeChannelParam {
            group_id: second.id,
            guild_id: 1,
            channel_id: 42,
        })
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
