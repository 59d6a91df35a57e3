use super::*;

/// Tests storing a slow mode delay for a group.
///
/// Expected: Ok with the updated delay persisted
#[tokio::test]
async fn stores_slowmode() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let repo = WormholeGroupRepository::new(db);

    let updated = repo.set_slowmode(group.id, 30).await?;
    assert_eq!(updated.map(|g| g.slowmode), Some(30));

    let stored = entity::prelude::WormholeGroup::find_by_id(group.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.slowmode, 30);

    Ok(())
}

/// Tests setting slow mode on a group that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_group() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = WormholeGroupRepository::new(db).set_slowmode(999, 30).await?;

    assert!(result.is_none());

    Ok(())
}
