use super::*;
use crate::server::error::AppError;
use sea_orm::{EntityTrait, PaginatorTrait};

/// Tests that deleting a robot removes its category rows and frees the slug.
///
/// Expected: Ok(true), no category rows left, slug reusable
#[tokio::test]
async fn deletes_robot_and_categories() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = RobotRepository::new(db);

    let robot = repo
        .create(
            create_params("foo", "Foo", &["Humanoid", "Research"]),
            Utc::now(),
        )
        .await?;

    assert!(repo.delete(robot.id).await?);
    assert!(repo.find_by_id(robot.id).await?.is_none());
    assert_eq!(entity::prelude::RobotCategory::find().count(db).await?, 0);
    assert!(!repo.slug_exists("foo", None).await?);

    Ok(())
}

/// Tests deleting a robot that does not exist.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_robot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    assert!(!RobotRepository::new(db).delete(42).await?);

    Ok(())
}
