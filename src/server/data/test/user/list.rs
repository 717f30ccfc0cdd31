use super::*;

/// Tests filtering users by role and search text.
///
/// Expected: role filter and search each narrow the result
#[tokio::test]
async fn filters_by_role_and_search() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    UserFactory::new(db).role("admin").build().await?;
    let grace = UserFactory::new(db)
        .email("grace@navy.mil")
        .first_name("Grace")
        .last_name("Hopper")
        .role("editor")
        .build()
        .await?;
    UserFactory::new(db).build().await?;

    let editors = repo
        .list(
            &UserFilter {
                role: Some(Role::Editor),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(editors.total, 1);
    assert_eq!(editors.users[0].id, grace.id);

    let searched = repo
        .list(
            &UserFilter {
                search: Some("hopper".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(searched.total, 1);

    let all = repo.list(&UserFilter::default(), 1, 2).await?;
    assert_eq!(all.total, 3);
    assert_eq!(all.pages, 2);
    assert_eq!(all.users.len(), 2);

    Ok(())
}

/// Tests role counts and recent registrations.
///
/// Expected: one user per role, two registered in the last 30 days
#[tokio::test]
async fn counts_roles_and_recent_registrations() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let now = Utc::now();

    UserFactory::new(db)
        .created_at(now - Duration::days(90))
        .build()
        .await?;
    UserFactory::new(db).role("editor").build().await?;
    UserFactory::new(db).role("admin").build().await?;

    let stats = UserRepository::new(db)
        .stats(now - Duration::days(30))
        .await?;

    assert_eq!(stats.total, 3);
    assert_eq!(stats.users, 1);
    assert_eq!(stats.editors, 1);
    assert_eq!(stats.admins, 1);
    assert_eq!(stats.recent_registrations, 2);

    Ok(())
}

/// Tests that LIKE wildcards in the search text are matched literally.
///
/// Expected: `%` matches nobody, `_` only matches the email containing one
#[tokio::test]
async fn search_treats_wildcards_literally() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let repo = UserRepository::new(db);

    let ada = UserFactory::new(db)
        .email("ada_l@example.com")
        .build()
        .await?;
    UserFactory::new(db)
        .email("adaxl@example.com")
        .build()
        .await?;

    let percent = repo
        .list(
            &UserFilter {
                search: Some("%".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(percent.total, 0);

    let underscore = repo
        .list(
            &UserFilter {
                search: Some("ada_".to_string()),
                ..Default::default()
            },
            1,
            10,
        )
        .await?;
    assert_eq!(underscore.total, 1);
    assert_eq!(underscore.users[0].id, ada.id);

    Ok(())
}
