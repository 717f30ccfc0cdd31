use super::*;

/// Tests resolving a numeric parameter as an ID.
///
/// Expected: Ok with the robot whose ID matches
#[tokio::test]
async fn resolves_numeric_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());

    let robot = RobotFactory::new(db)
        .slug("atlas")
        .published()
        .build()
        .await?;

    let found = RobotService::new(db, &storage)
        .get(&robot.id.to_string(), false)
        .await?;

    assert_eq!(found.slug, "atlas");

    Ok(())
}

/// Tests an all-digit slug that does not match any ID.
///
/// Expected: Ok with the robot found by slug
#[tokio::test]
async fn falls_back_to_numeric_slug() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());

    let robot = RobotFactory::new(db)
        .name("2001")
        .slug("2001")
        .published()
        .build()
        .await?;

    let found = RobotService::new(db, &storage).get("2001", false).await?;

    assert_eq!(found.id, robot.id);

    Ok(())
}

/// Tests that drafts are only visible in the admin view.
///
/// Expected: public Err(AppError::NotFound), admin Ok
#[tokio::test]
async fn hides_drafts_from_public() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let service = RobotService::new(db, &storage);

    RobotFactory::new(db).slug("draft-bot").build().await?;

    assert!(matches!(
        service.get("draft-bot", false).await,
        Err(AppError::NotFound(_))
    ));
    assert!(service.get("draft-bot", true).await.is_ok());
    assert!(matches!(
        service.get("missing", true).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}

/// Tests that the public listing only contains published robots.
///
/// Expected: Ok with one robot out of three
#[tokio::test]
async fn public_listing_is_published_only() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());

    RobotFactory::new(db)
        .slug("visible")
        .published()
        .build()
        .await?;
    RobotFactory::new(db).slug("hidden").build().await?;
    RobotFactory::new(db)
        .slug("retired")
        .status("archived")
        .build()
        .await?;

    let filter = RobotFilter {
        published_only: true,
        ..Default::default()
    };
    let page = RobotService::new(db, &storage).list(&filter, 1, 10).await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.pages, 1);
    assert_eq!(page.robots[0].slug, "visible");

    Ok(())
}
