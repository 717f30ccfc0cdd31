use super::*;
use crate::server::error::AppError;

/// Tests that public listings only include published robots, newest first.
///
/// Expected: Ok with drafts and archived robots excluded
#[tokio::test]
async fn lists_published_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    let older = RobotFactory::new(db)
        .published()
        .created_at(now - Duration::days(2))
        .build()
        .await?;
    let newer = RobotFactory::new(db)
        .published()
        .created_at(now - Duration::days(1))
        .build()
        .await?;
    RobotFactory::new(db).build().await?;
    RobotFactory::new(db).status("archived").build().await?;

    let filter = RobotFilter {
        published_only: true,
        ..Default::default()
    };
    let page = RobotRepository::new(db).list(&filter, 1, 10).await?;

    assert_eq!(page.total, 2);
    assert_eq!(page.pages, 1);
    let ids: Vec<i32> = page.robots.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    Ok(())
}

/// Tests that admin listings include every status.
///
/// Expected: Ok with all robots counted
#[tokio::test]
async fn lists_all_statuses_without_published_filter() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    RobotFactory::new(db).published().build().await?;
    RobotFactory::new(db).build().await?;
    RobotFactory::new(db).status("archived").build().await?;

    let page = RobotRepository::new(db)
        .list(&RobotFilter::default(), 1, 10)
        .await?;

    assert_eq!(page.total, 3);

    Ok(())
}

/// Tests pagination metadata across pages.
///
/// Expected: 5 robots at 2 per page give 3 pages with 1 robot on the last
#[tokio::test]
async fn paginates_results() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..5 {
        RobotFactory::new(db).published().build().await?;
    }

    let repo = RobotRepository::new(db);
    let filter = RobotFilter::default();
    let last = repo.list(&filter, 3, 2).await?;

    assert_eq!(last.total, 5);
    assert_eq!(last.pages, 3);
    assert_eq!(last.page, 3);
    assert_eq!(last.robots.len(), 1);

    Ok(())
}

/// Tests category, manufacturer and search filters.
///
/// Expected: each filter narrows the result to the matching robot
#[tokio::test]
async fn filters_by_category_manufacturer_and_search() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let spot = RobotFactory::new(db)
        .name("Spot")
        .manufacturer("Boston Dynamics")
        .categories(&["Quadruped"])
        .published()
        .build()
        .await?;
    let digit = RobotFactory::new(db)
        .name("Digit")
        .manufacturer("Agility Robotics")
        .summary("A bipedal warehouse worker")
        .categories(&["Humanoid"])
        .published()
        .build()
        .await?;

    let repo = RobotRepository::new(db);

    let by_category = repo
        .list(
            &RobotFilter {
                category: Some("Quadruped".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(by_category.robots.len(), 1);
    assert_eq!(by_category.robots[0].id, spot.id);

    let by_manufacturer = repo
        .list(
            &RobotFilter {
                manufacturer: Some("agility".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(by_manufacturer.robots.len(), 1);
    assert_eq!(by_manufacturer.robots[0].id, digit.id);

    let by_search = repo
        .list(
            &RobotFilter {
                search: Some("warehouse".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(by_search.robots.len(), 1);
    assert_eq!(by_search.robots[0].id, digit.id);

    let unknown_category = repo
        .list(
            &RobotFilter {
                category: Some("Drone".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(unknown_category.total, 0);

    Ok(())
}

/// Tests that LIKE wildcards in search and manufacturer filters are matched literally.
///
/// Expected: `%` matches nothing, `50%` only matches the robot named with it
#[tokio::test]
async fn search_treats_wildcards_literally() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let half = RobotFactory::new(db)
        .name("Atlas 50% Scale")
        .published()
        .build()
        .await?;
    RobotFactory::new(db)
        .name("Atlas 500")
        .published()
        .build()
        .await?;

    let repo = RobotRepository::new(db);

    let percent = repo
        .list(
            &RobotFilter {
                search: Some("%".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(percent.total, 0);

    let literal = repo
        .list(
            &RobotFilter {
                search: Some("50%".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(literal.total, 1);
    assert_eq!(literal.robots[0].id, half.id);

    let manufacturer = repo
        .list(
            &RobotFilter {
                manufacturer: Some("_".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(manufacturer.total, 0);

    Ok(())
}
