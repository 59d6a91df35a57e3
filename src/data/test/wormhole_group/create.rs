use super::*;

/// Tests creating a new wormhole group.
///
/// Expected: Ok with an empty group and slow mode disabled
#[tokio::test]
async fn creates_empty_group() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WormholeGroupRepository::new(db);
    let group = repo
        .create(CreateWormholeGroupParam {
            name: "universities".to_string(),
        })
        .await?;

    assert_eq!(group.name, "universities");
    assert_eq!(group.slowmode, 0);
    assert!(group.channels.is_empty());

    let found = repo.find_by_name("universities").await?;
    assert_eq!(found.map(|g| g.id), Some(group.id));

    Ok(())
}

/// Tests that group names are unique.
///
/// Expected: Err on the second insert with the same name
#[tokio::test]
async fn rejects_duplicate_name() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_wormhole_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WormholeGroupRepository::new(db);
    repo.create(CreateWormholeGroupParam {
        name: "universities".to_string(),
    })
    .await?;

    let result = repo
        .create(CreateWormholeGroupParam {
            name: "universities".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AppError::DbErr(_))));

    Ok(())
}
