use super::*;

/// Tests replacing the favorites and recently viewed lists.
///
/// Expected: both lists read back as written
#[tokio::test]
async fn stores_activity_lists() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = UserFactory::new(db).build().await?;
    let viewed_at = Utc::now();
    let recent = vec![RecentlyViewedDto {
        robot: 3,
        viewed_at,
    }];

    repo.set_favorites(user.id, &[5, 2]).await?;
    repo.set_recently_viewed(user.id, &recent).await?;

    let user = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(user.favorite_robots, vec![5, 2]);
    assert_eq!(user.recently_viewed, recent);

    Ok(())
}
