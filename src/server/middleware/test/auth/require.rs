use super::*;

/// Tests that anonymous requests are rejected.
///
/// Expected: Err(AuthError::MissingToken)
#[tokio::test]
async fn rejects_anonymous_request() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);
    let headers = HeaderMap::new();

    let result = AuthGuard::new(&state, &headers, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    Ok(())
}

/// Tests authentication through the session alone.
///
/// Expected: Ok(User) for the user stored in the session
#[tokio::test]
async fn accepts_session_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);
    let headers = HeaderMap::new();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(&state, &headers, session)
        .require(&[])
        .await?;

    assert_eq!(result.id, user.id);

    Ok(())
}

/// Tests authentication through a bearer token.
///
/// Expected: Ok(User) for the token subject
#[tokio::test]
async fn accepts_bearer_token() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);

    let entity = factory::create_user(db).await?;
    let user = User::from_entity(entity)?;
    let headers = bearer(&state.tokens.issue(&user)?);

    let result = AuthGuard::new(&state, &headers, session)
        .require(&[])
        .await?;

    assert_eq!(result.id, user.id);

    Ok(())
}

/// Tests that a tampered token is rejected even with a valid session.
///
/// Expected: Err(AuthError::InvalidToken)
#[tokio::test]
async fn rejects_invalid_token() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;
    let headers = bearer("not.a.token");

    let result = AuthGuard::new(&state, &headers, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidToken(_)))
    ));

    Ok(())
}

/// Tests a session referencing a deleted user.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_vanished_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);
    let headers = HeaderMap::new();

    AuthSession::new(session).set_user_id(999).await?;

    let result = AuthGuard::new(&state, &headers, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(999)))
    ));

    Ok(())
}

/// Tests the editor permission across roles.
///
/// Expected: users denied, editors and admins allowed
#[tokio::test]
async fn editor_permission_allows_editors_and_admins() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);

    for (role, allowed) in [("user", false), ("editor", true), ("admin", true)] {
        let entity = factory::user::create_user_with_role(db, role).await?;
        let headers = bearer(&state.tokens.issue(&User::from_entity(entity)?)?);

        let result = AuthGuard::new(&state, &headers, session)
            .require(&[Permission::Editor])
            .await;

        if allowed {
            assert!(result.is_ok(), "{} should pass", role);
        } else {
            assert!(matches!(
                result,
                Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
            ));
        }
    }

    Ok(())
}

/// Tests the admin permission rejects editors.
///
/// Expected: Err(AuthError::AccessDenied) for an editor, Ok for an admin
#[tokio::test]
async fn admin_permission_rejects_editors() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();
    let state = test_state(db);

    let editor = User::from_entity(factory::user::create_user_with_role(db, "editor").await?)?;
    let admin = User::from_entity(factory::user::create_user_with_role(db, "admin").await?)?;

    let editor_headers = bearer(&state.tokens.issue(&editor)?);
    let admin_headers = bearer(&state.tokens.issue(&admin)?);

    let denied = AuthGuard::new(&state, &editor_headers, session)
        .require(&[Permission::Admin])
        .await;
    let granted = AuthGuard::new(&state, &admin_headers, session)
        .require(&[Permission::Admin])
        .await?;

    assert!(matches!(
        denied,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));
    assert_eq!(granted.id, admin.id);

    Ok(())
}
