use super::*;

/// Tests deleting a group together with its channel memberships.
///
/// Expected: Ok(true) and no channels left behind
#[tokio::test]
async fn deletes_group_and_channels() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (group, _) = factory::helpers::create_group_with_channels(db, 2).await?;

    let deleted = WormholeGroupRepository::new(db).delete(group.id).await?;

    assert!(deleted);
    assert_eq!(entity::prelude::WormholeGroup::find().count(db).await?, 0);
    assert_eq!(entity::prelude::WormholeChannel::find().count(db).await?, 0);

    Ok(())
}

/// Tests deleting a group that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_group() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let deleted = WormholeGroupRepository::new(db).delete(999).await?;

    assert!(!deleted);

    Ok(())
}
