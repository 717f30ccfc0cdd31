use super::*;

/// Tests logging in with valid credentials.
///
/// Expected: Ok with a verifiable token and last_login stamped
#[tokio::test]
async fn logs_in_with_valid_credentials() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let user = user_with_password(db, "ada@example.com", "secret1", "user").await?;

    let auth = AuthService::new(db, &tokens)
        .login("ADA@example.com", "secret1", false)
        .await?;

    assert_eq!(auth.user.id, user.id);
    assert!(auth.user.last_login.is_some());
    assert_eq!(tokens.verify(&auth.token)?.sub, user.id);

    Ok(())
}

/// Tests that a wrong password and an unknown email fail the same way.
///
/// Expected: Err(AuthError::InvalidCredentials) for both
#[tokio::test]
async fn rejects_bad_credentials_uniformly() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let service = AuthService::new(db, &tokens);
    user_with_password(db, "ada@example.com", "secret1", "user").await?;

    assert!(matches!(
        service.login("ada@example.com", "wrong-pass", false).await,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        service.login("nobody@example.com", "secret1", false).await,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    Ok(())
}

/// Tests the staff-only login used by the admin area.
///
/// Expected: plain users Err(AuthError::AccessDenied), editors Ok
#[tokio::test]
async fn staff_login_rejects_plain_users() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let service = AuthService::new(db, &tokens);
    user_with_password(db, "user@example.com", "secret1", "user").await?;
    user_with_password(db, "editor@example.com", "secret1", "editor").await?;

    assert!(matches!(
        service.login("user@example.com", "secret1", true).await,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));
    assert!(service
        .login("editor@example.com", "secret1", true)
        .await
        .is_ok());

    Ok(())
}
