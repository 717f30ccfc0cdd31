use super::*;
use crate::server::error::AppError;

/// Tests the category histogram over published robots.
///
/// Verifies that drafts are ignored and that ties on count are broken by name.
///
/// Expected: [Humanoid: 2, Industrial: 1, Research: 1]
#[tokio::test]
async fn counts_published_categories() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    RobotFactory::new(db)
        .published()
        .categories(&["Humanoid", "Research"])
        .build()
        .await?;
    RobotFactory::new(db)
        .published()
        .categories(&["Humanoid", "Industrial"])
        .build()
        .await?;
    RobotFactory::new(db).categories(&["Drone"]).build().await?;

    let counts = RobotRepository::new(db).category_counts().await?;
    let pairs: Vec<(&str, u64)> = counts.iter().map(|c| (c.name.as_str(), c.count)).collect();

    assert_eq!(
        pairs,
        vec![("Humanoid", 2), ("Industrial", 1), ("Research", 1)]
    );

    Ok(())
}

/// Tests most viewed robots limited to published ones.
///
/// Expected: published robots by views descending
#[tokio::test]
async fn most_viewed_orders_by_views() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let low = RobotFactory::new(db).published().views(1).build().await?;
    let high = RobotFactory::new(db).published().views(50).build().await?;
    RobotFactory::new(db).views(100).build().await?;

    let robots = RobotRepository::new(db).most_viewed(5, true).await?;
    let ids: Vec<i32> = robots.iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![high.id, low.id]);

    Ok(())
}
