use super::*;

/// Tests creating an account.
///
/// Verifies that the email is normalized to lowercase and the activity lists start empty.
///
/// Expected: Ok with lowercase email, default preferences and role user
#[tokio::test]
async fn creates_user_with_lowercase_email() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = repo
        .create(create_params(" Ada@Example.COM "), Utc::now())
        .await?;

    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.role, Role::User);
    assert_eq!(user.preferences.theme, "light");
    assert!(user.favorite_robots.is_empty());
    assert!(user.recently_viewed.is_empty());
    assert!(user.last_login.is_none());

    let found = repo.find_by_email("ADA@example.com").await?;
    assert_eq!(found.map(|u| u.id), Some(user.id));

    Ok(())
}

/// Tests email existence checks with and without an excluded user.
///
/// Expected: taken for others, free for the owner
#[tokio::test]
async fn email_exists_honours_exclusion() -> Result<(), AppError> {
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

    assert!(repo.email_exists("ADA@example.com", None).await?);
    assert!(!repo.email_exists("ada@example.com", Some(user.id)).await?);
    assert!(!repo.email_exists("grace@example.com", None).await?);

    Ok(())
}

/// Tests deleting an account.
///
/// Expected: Ok(true) then Ok(false) on the second attempt
#[tokio::test]
async fn deletes_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let user = UserFactory::new(db).build().await?;

    assert!(repo.delete(user.id).await?);
    assert!(!repo.delete(user.id).await?);
    assert!(repo.find_by_id(user.id).await?.is_none());

    Ok(())
}
