use axum::http::{header::AUTHORIZATION, HeaderMap};
use tower_sessions::Session;

use crate::{
    model::user::Role,
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, AppError},
        middleware::session::AuthSession,
        model::user::User,
        state::AppState,
    },
};

pub enum Permission {
    /// Role `admin`.
    Admin,
    /// Role `editor` or `admin`.
    Editor,
}

/// Resolves the calling user and checks their role.
///
/// A `Bearer` token in the `Authorization` header takes precedence; without one the
/// user ID stored in the session is used.
pub struct AuthGuard<'a> {
    state: &'a AppState,
    headers: &'a HeaderMap,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(state: &'a AppState, headers: &'a HeaderMap, session: &'a Session) -> Self {
        Self {
            state,
            headers,
            session,
        }
    }

    /// Requires an authenticated user holding every listed permission.
    ///
    /// An empty permission list only requires authentication.
    ///
    /// # Returns
    /// - `Ok(User)` - The authenticated user
    /// - `Err(AuthError::MissingToken)` - No token and no session (401)
    /// - `Err(AuthError::InvalidToken | UserNotInDatabase)` - Credentials rejected (401)
    /// - `Err(AuthError::AccessDenied)` - Role too low (403)
    pub async fn require(&self, permissions: &[Permission]) -> Result<User, AppError> {
        let Some(user) = self.identify().await? else {
            return Err(AuthError::MissingToken.into());
        };

        for permission in permissions {
            let allowed = match permission {
                Permission::Admin => user.role == Role::Admin,
                Permission::Editor => user.role.can_edit_robots(),
            };

            if !allowed {
                return Err(AuthError::AccessDenied(
                    user.id,
                    format!("role '{}' lacks the permission for this request", user.role),
                )
                .into());
            }
        }

        Ok(user)
    }

    /// Resolves the calling user without requiring one.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Request carries valid credentials
    /// - `Ok(None)` - Anonymous request
    /// - `Err(AppError)` - Credentials present but invalid, or lookup failed
    pub async fn identify(&self) -> Result<Option<User>, AppError> {
        let user_repo = UserRepository::new(&self.state.db);

        let user_id = if let Some(token) = bearer_token(self.headers) {
            let claims = self.state.tokens.verify(token)?;
            claims.sub
        } else if let Some(user_id) = AuthSession::new(self.session).get_user_id().await? {
            user_id
        } else {
            return Ok(None);
        };

        match user_repo.find_by_id(user_id).await? {
            Some(user) => Ok(Some(user)),
            None => Err(AuthError::UserNotInDatabase(user_id).into()),
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
