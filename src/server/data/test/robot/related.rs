use super::*;
use crate::server::error::AppError;

/// Tests related robots sharing a category.
///
/// Verifies that the robot itself, drafts and robots without shared categories are
/// excluded and that at most `limit` robots are returned.
///
/// Expected: Ok with up to 3 published robots sharing a category
#[tokio::test]
async fn finds_published_robots_sharing_a_category() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = RobotRepository::new(db);

    let atlas = RobotFactory::new(db)
        .published()
        .categories(&["Humanoid"])
        .build()
        .await?;
    for _ in 0..4 {
        RobotFactory::new(db)
            .published()
            .categories(&["Humanoid"])
            .build()
            .await?;
    }
    RobotFactory::new(db)
        .categories(&["Humanoid"])
        .build()
        .await?;
    RobotFactory::new(db)
        .published()
        .categories(&["Drone"])
        .build()
        .await?;

    let atlas = repo.find_by_id(atlas.id).await?.unwrap();
    let related = repo.related(&atlas, 3).await?;

    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|r| r.id != atlas.id));
    assert!(related.iter().all(|r| r.is_published()));
    assert!(related
        .iter()
        .all(|r| r.categories.contains(&"Humanoid".to_string())));

    Ok(())
}

/// Tests related robots for a robot without categories.
///
/// Expected: Ok(empty)
#[tokio::test]
async fn returns_empty_without_categories() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = RobotRepository::new(db);

    let lonely = RobotFactory::new(db).published().build().await?;
    RobotFactory::new(db)
        .published()
        .categories(&["Humanoid"])
        .build()
        .await?;

    let lonely = repo.find_by_id(lonely.id).await?.unwrap();

    assert!(repo.related(&lonely, 3).await?.is_empty());

    Ok(())
}
