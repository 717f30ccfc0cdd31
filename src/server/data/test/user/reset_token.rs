use super::*;

/// Tests finding a user by an unexpired reset token hash.
///
/// Expected: Ok(Some) before expiry, Ok(None) after clearing
#[tokio::test]
async fn finds_user_by_valid_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = UserFactory::new(db).build().await?;
    let now = Utc::now();

    repo.set_reset_token(
        user.id,
        Some(("abc".to_string(), now + Duration::minutes(10))),
    )
    .await?;

    let found = repo.find_by_reset_token("abc", now).await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    repo.set_reset_token(user.id, None).await?;
    assert!(repo.find_by_reset_token("abc", now).await?.is_none());

    Ok(())
}

/// Tests that expired tokens are not matched.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_expired_token() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = UserFactory::new(db).build().await?;
    let now = Utc::now();

    repo.set_reset_token(
        user.id,
        Some(("abc".to_string(), now - Duration::minutes(1))),
    )
    .await?;

    assert!(repo.find_by_reset_token("abc", now).await?.is_none());
    assert!(repo.find_by_reset_token("other", now).await?.is_none());

    Ok(())
}
