use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Request carries neither a bearer token nor an authenticated session.
    #[error("Request is not authenticated")]
    MissingToken,

    /// Bearer token failed signature or expiry validation.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// Token or session references a user that no longer exists.
    #[error("User {0} from credentials not found in database")]
    UserNotInDatabase(i32),

    /// Login attempt with an unknown email or a wrong password.
    ///
    /// Both cases share one variant so responses cannot be used to probe for
    /// registered emails.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authenticated user lacks the role required for the operation.
    ///
    /// # Fields
    /// - ID of the user who was denied
    /// - Description of the denied operation for server-side logs
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),
}

/// Converts authentication errors into HTTP responses.
///
/// - `MissingToken` / `InvalidToken` / `UserNotInDatabase` → 401 Unauthorized
/// - `InvalidCredentials` → 401 Unauthorized with "Invalid credentials"
/// - `AccessDenied` → 403 Forbidden
///
/// Details are logged at debug level; client-facing messages stay generic.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "Not authorized, no token"),
            Self::InvalidToken(_) | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Not authorized, token failed")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Self::AccessDenied(_, _) => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action",
            ),
        };

        (status, Json(ErrorDto::new(message))).into_response()
    }
}
