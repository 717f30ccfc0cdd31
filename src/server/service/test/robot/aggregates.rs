use super::*;
use chrono::{Duration, Utc};

/// Tests the popular list ordering and visibility.
///
/// Expected: published robots only, most viewed first, capped at the limit
#[tokio::test]
async fn popular_orders_by_views() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());

    RobotFactory::new(db)
        .slug("low")
        .published()
        .views(1)
        .build()
        .await?;
    RobotFactory::new(db)
        .slug("high")
        .published()
        .views(50)
        .build()
        .await?;
    RobotFactory::new(db)
        .slug("mid")
        .published()
        .views(10)
        .build()
        .await?;
    RobotFactory::new(db)
        .slug("secret")
        .views(500)
        .build()
        .await?;

    let popular = RobotService::new(db, &storage).popular(Some(2)).await?;

    let slugs: Vec<&str> = popular.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["high", "mid"]);

    Ok(())
}

/// Tests that related robots are capped at three and exclude the robot itself.
///
/// Expected: Ok with three published robots sharing a category
#[tokio::test]
async fn related_caps_at_three() -> Result<(), AppError> {
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
        .published()
        .categories(&["Industrial"])
        .build()
        .await?;

    let related = RobotService::new(db, &storage)
        .related("atlas", false)
        .await?;

    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|r| r.id != robot.id));
    assert!(related
        .iter()
        .all(|r| r.categories.contains(&"Humanoid".to_string())));

    Ok(())
}

/// Tests that related robots of an unpublished robot are hidden from the public view.
///
/// Expected: Err(AppError::NotFound) publicly, Ok with the published neighbour in the
/// admin view
#[tokio::test]
async fn related_of_draft_requires_admin_view() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());

    RobotFactory::new(db)
        .slug("prototype")
        .categories(&["Humanoid"])
        .build()
        .await?;
    let neighbour = RobotFactory::new(db)
        .published()
        .categories(&["Humanoid"])
        .build()
        .await?;

    let service = RobotService::new(db, &storage);

    assert!(matches!(
        service.related("prototype", false).await,
        Err(AppError::NotFound(_))
    ));
    let related = service.related("prototype", true).await?;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].id, neighbour.id);

    Ok(())
}

/// Tests the dashboard report totals.
///
/// Expected: counts per status, summed views, newest robot first in recently added
#[tokio::test]
async fn stats_summarise_catalog() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalMediaStorage::new(dir.path());
    let now = Utc::now();

    RobotFactory::new(db)
        .slug("a")
        .published()
        .categories(&["Humanoid"])
        .views(5)
        .created_at(now - Duration::days(2))
        .build()
        .await?;
    RobotFactory::new(db)
        .slug("b")
        .views(7)
        .created_at(now - Duration::days(1))
        .build()
        .await?;
    RobotFactory::new(db)
        .slug("c")
        .status("archived")
        .created_at(now)
        .build()
        .await?;

    let report = RobotService::new(db, &storage).stats().await?;

    assert_eq!(report.total, 3);
    assert_eq!(report.published, 1);
    assert_eq!(report.draft, 1);
    assert_eq!(report.archived, 1);
    assert_eq!(report.total_views, 12);
    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.most_viewed[0].slug, "b");
    assert_eq!(report.recently_added[0].slug, "c");

    Ok(())
}
