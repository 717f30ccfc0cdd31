//! Account authentication: login, registration and password reset.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    model::{api::FieldErrorDto, user::Role},
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        model::{
            auth::{Authenticated, RegisterParams},
            user::{CreateUserParams, UpdateUserParams, User},
        },
        service::token::TokenService,
        util::{
            password::{hash_password, validate_password, verify_password},
            random::{random_hex, sha256_hex},
        },
    },
};

/// Lifetime of a password reset token.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, tokens: &'a TokenService) -> Self {
        Self { db, tokens }
    }

    /// Verifies credentials, stamps the login time and issues a token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    ///
    /// # Arguments
    /// - `email` - Account email, any case
    /// - `password` - Plain password
    /// - `staff_only` - Reject accounts that are neither editor nor admin
    ///
    /// # Returns
    /// - `Ok(Authenticated)` - Token and refreshed user
    /// - `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password (401)
    /// - `Err(AuthError::AccessDenied)` - `staff_only` and the role is `user` (403)
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        staff_only: bool,
    ) -> Result<Authenticated, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        if staff_only && !user.role.can_edit_robots() {
            return Err(AuthError::AccessDenied(
                user.id,
                "attempted admin login without an admin or editor role".to_string(),
            )
            .into());
        }

        user_repo.set_last_login(user.id, Utc::now()).await?;
        let user = user_repo
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("User {} logged in", user.id);

        self.authenticated(user)
    }

    /// Registers a new account with the `user` role and logs it in.
    ///
    /// # Returns
    /// - `Ok(Authenticated)` - Token and created user
    /// - `Err(AppError::Validation)` - Missing names, malformed email or short password
    /// - `Err(AppError::BadRequest)` - Email already registered
    pub async fn register(&self, params: RegisterParams) -> Result<Authenticated, AppError> {
        let mut errors = Vec::new();
        if !is_plausible_email(&params.email) {
            errors.push(FieldErrorDto::new("email", "A valid email is required"));
        }
        if params.first_name.trim().is_empty() {
            errors.push(FieldErrorDto::new("firstName", "First name is required"));
        }
        if params.last_name.trim().is_empty() {
            errors.push(FieldErrorDto::new("lastName", "Last name is required"));
        }
        if let Err(AppError::Validation(mut password_errors)) = validate_password(&params.password)
        {
            errors.append(&mut password_errors);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let user_repo = UserRepository::new(self.db);

        if user_repo.email_exists(&params.email, None).await? {
            return Err(AppError::BadRequest("User already exists".to_string()));
        }

        let user = user_repo
            .create(
                CreateUserParams {
                    email: params.email,
                    password_hash: hash_password(&params.password)?,
                    first_name: params.first_name.trim().to_string(),
                    last_name: params.last_name.trim().to_string(),
                    role: Role::User,
                },
                Utc::now(),
            )
            .await?;

        tracing::info!("Registered user {}", user.id);

        self.authenticated(user)
    }

    /// Starts a password reset.
    ///
    /// Stores the SHA-256 of a fresh random token with a short expiry. Nothing is
    /// revealed about whether the email is registered.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - Raw token to deliver to the account owner
    /// - `Ok(None)` - No account with that email
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(email).await? else {
            return Ok(None);
        };

        let token = random_hex(20);
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        user_repo
            .set_reset_token(user.id, Some((sha256_hex(&token), expires)))
            .await?;

        Ok(Some(token))
    }

    /// Completes a password reset and logs the user in.
    ///
    /// # Returns
    /// - `Ok(Authenticated)` - Password replaced, token cleared
    /// - `Err(AppError::Validation)` - New password too short
    /// - `Err(AppError::BadRequest)` - Token unknown or expired; nothing is changed
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
    ) -> Result<Authenticated, AppError> {
        validate_password(password)?;

        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo
            .find_by_reset_token(&sha256_hex(token), Utc::now())
            .await?
        else {
            return Err(AppError::BadRequest("Invalid or expired token".to_string()));
        };

        let user = user_repo
            .update(UpdateUserParams {
                id: user.id,
                password_hash: Some(hash_password(password)?),
                ..Default::default()
            })
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user_repo.set_reset_token(user.id, None).await?;

        tracing::info!("User {} reset their password", user.id);

        self.authenticated(user)
    }

    /// Creates the configured admin account if it does not exist yet.
    ///
    /// # Returns
    /// - `Ok(User)` - The created admin
    /// - `Err(AppError::BadRequest)` - The account already exists
    pub async fn init_admin(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);

        if user_repo.email_exists(email, None).await? {
            return Err(AppError::BadRequest(
                "Admin user already exists".to_string(),
            ));
        }

        let admin = user_repo
            .create(
                CreateUserParams {
                    email: email.to_string(),
                    password_hash: hash_password(password)?,
                    first_name: "Admin".to_string(),
                    last_name: "User".to_string(),
                    role: Role::Admin,
                },
                Utc::now(),
            )
            .await?;

        tracing::info!("Created admin account {}", admin.email);

        Ok(admin)
    }

    fn authenticated(&self, user: User) -> Result<Authenticated, AppError> {
        Ok(Authenticated {
            token: self.tokens.issue(&user)?,
            user,
        })
    }
}

/// Loose shape check: something before and after a single `@`, with a dot in the domain.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
