use super::*;

/// Tests a partial profile update.
///
/// Expected: provided fields change, others are untouched
#[tokio::test]
async fn updates_only_provided_fields() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = repo
        .create(create_params("ada@example.com"), Utc::now())
        .await?;

    let updated = repo
        .update(UpdateUserParams {
            id: user.id,
            first_name: Some("Augusta".to_string()),
            role: Some(Role::Editor),
            ..Default::default()
        })
        .await?
        .unwrap();

    assert_eq!(updated.first_name, "Augusta");
    assert_eq!(updated.last_name, "Lovelace");
    assert_eq!(updated.role, Role::Editor);
    assert_eq!(updated.email, "ada@example.com");
    assert_eq!(updated.password_hash, "hash");

    Ok(())
}

/// Tests updating a missing user.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = UserRepository::new(db)
        .update(UpdateUserParams {
            id: 404,
            ..Default::default()
        })
        .await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests stamping the last login time.
///
/// Expected: last_login set to the given time
#[tokio::test]
async fn sets_last_login() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = UserFactory::new(db).build().await?;
    let now = Utc::now();

    repo.set_last_login(user.id, now).await?;

    let user = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(user.last_login, Some(now));

    Ok(())
}
