use super::*;

/// Tests adding a favorite.
///
/// Expected: Ok with the robot listed and its favorites counter at 1
#[tokio::test]
async fn adds_favorite_and_bumps_counter() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = user_with_role(db, "user").await?;
    let robot = RobotFactory::new(db).published().build().await?;

    let favorites = UserService::new(db).add_favorite(&user, robot.id).await?;

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, robot.id);
    assert_eq!(reload(db, user.id).await?.favorite_robots, vec![robot.id]);
    let stored = RobotRepository::new(db)
        .find_by_id(robot.id)
        .await?
        .unwrap();
    assert_eq!(stored.favorites, 1);

    Ok(())
}

/// Tests adding the same favorite twice.
///
/// Expected: Err(AppError::BadRequest), list and counter unchanged
#[tokio::test]
async fn rejects_duplicate_favorite() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = UserService::new(db);
    let user = user_with_role(db, "user").await?;
    let robot = RobotFactory::new(db).published().build().await?;

    service.add_favorite(&user, robot.id).await?;
    let user = reload(db, user.id).await?;
    let result = service.add_favorite(&user, robot.id).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(reload(db, user.id).await?.favorite_robots, vec![robot.id]);
    let stored = RobotRepository::new(db)
        .find_by_id(robot.id)
        .await?
        .unwrap();
    assert_eq!(stored.favorites, 1);

    Ok(())
}

/// Tests favoriting a robot that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn rejects_unknown_robot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = user_with_role(db, "user").await?;

    let result = UserService::new(db).add_favorite(&user, 9999).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests removing favorites.
///
/// Expected: Ok after removal with the counter back at 0; a second removal is
/// Err(AppError::BadRequest)
#[tokio::test]
async fn removes_favorite() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = UserService::new(db);
    let user = user_with_role(db, "user").await?;
    let robot = RobotFactory::new(db).published().build().await?;

    service.add_favorite(&user, robot.id).await?;
    let user = reload(db, user.id).await?;

    let favorites = service.remove_favorite(&user, robot.id).await?;
    assert!(favorites.is_empty());
    let stored = RobotRepository::new(db)
        .find_by_id(robot.id)
        .await?
        .unwrap();
    assert_eq!(stored.favorites, 0);

    let user = reload(db, user.id).await?;
    assert!(matches!(
        service.remove_favorite(&user, robot.id).await,
        Err(AppError::BadRequest(_))
    ));

    Ok(())
}

/// Tests that favorites are returned in the order they were added.
///
/// Expected: Ok with robots in insertion order
#[tokio::test]
async fn lists_favorites_in_order() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let service = UserService::new(db);
    let user = user_with_role(db, "user").await?;
    let first = RobotFactory::new(db).published().build().await?;
    let second = RobotFactory::new(db).published().build().await?;

    service.add_favorite(&user, second.id).await?;
    let user = reload(db, user.id).await?;
    service.add_favorite(&user, first.id).await?;
    let user = reload(db, user.id).await?;

    let favorites = service.favorites(&user).await?;

    let ids: Vec<i32> = favorites.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    Ok(())
}
