use super::*;
use crate::model::user::Role;

fn params(email: &str, password: &str) -> RegisterParams {
    RegisterParams {
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

/// Tests registering a new account.
///
/// Expected: Ok with role user, lowercased email and a hashed password
#[tokio::test]
async fn registers_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();

    let auth = AuthService::new(db, &tokens)
        .register(params("Ada@Example.com", "secret1"))
        .await?;

    assert_eq!(auth.user.role, Role::User);
    assert_eq!(auth.user.email, "ada@example.com");
    assert_ne!(auth.user.password_hash, "secret1");
    assert_eq!(tokens.verify(&auth.token)?.role, Role::User);

    Ok(())
}

/// Tests registering an email that is already taken.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_existing_email() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let service = AuthService::new(db, &tokens);

    service
        .register(params("ada@example.com", "secret1"))
        .await?;
    let result = service.register(params("ADA@example.com", "secret2")).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests password and email validation.
///
/// Expected: Err(AppError::Validation) naming both fields
#[tokio::test]
async fn validates_email_and_password() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();

    let result = AuthService::new(db, &tokens)
        .register(params("not-an-email", "123"))
        .await;

    let errors = match result {
        Err(AppError::Validation(errors)) => errors,
        other => panic!(
            "expected validation error, got {:?}",
            other.map(|a| a.user.id)
        ),
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["email", "password"]);

    Ok(())
}

/// Tests seeding the admin account once.
///
/// Expected: first call Ok with role admin, second Err(AppError::BadRequest)
#[tokio::test]
async fn init_admin_runs_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_robot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let tokens = tokens();
    let service = AuthService::new(db, &tokens);

    let admin = service.init_admin("admin@example.com", "secret1").await?;
    assert_eq!(admin.role, Role::Admin);

    assert!(matches!(
        service.init_admin("admin@example.com", "secret1").await,
        Err(AppError::BadRequest(_))
    ));

    Ok(())
}
