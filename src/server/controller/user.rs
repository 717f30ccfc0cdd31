use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        robot::RobotDto,
        user::{PaginatedUsersDto, Role, UpdateUserDto, UserDto, UserStatsDto},
    },
    server::{
        controller::robot::robot_dtos,
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::user::UserFilter,
        service::user::UserService,
        state::AppState,
        util::parse::page_bounds,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

#[derive(Deserialize)]
pub struct UserListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub role: Option<String>,
    pub search: Option<String>,
}

/// List user accounts.
///
/// # Access Control
/// - `Admin` - Only admins can list users
///
/// # Returns
/// - `200 OK` - Page of users, newest first
/// - `400 Bad Request` - Unknown role filter
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Users per page (default: 10, max: 100)"),
        ("role" = Option<String>, Query, description = "Only users with this role"),
        ("search" = Option<String>, Query, description = "Email or name substring")
    ),
    responses(
        (status = 200, description = "Successfully retrieved users", body = PaginatedUsersDto),
        (status = 400, description = "Invalid role filter", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Admin])
        .await?;

    let role = match params.role.as_deref().filter(|r| !r.trim().is_empty()) {
        Some(role) => Some(
            role.parse::<Role>()
                .map_err(|e| AppError::field("role", e))?,
        ),
        None => None,
    };
    let filter = UserFilter {
        role,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };
    let (page, limit) = page_bounds(params.page, params.limit);

    let users = UserService::new(&state.db)
        .list(&filter, page, limit)
        .await?;

    Ok((StatusCode::OK, Json(users.into_dto())))
}

/// Get account statistics.
///
/// # Access Control
/// - `Admin` - Only admins can view account statistics
///
/// # Returns
/// - `200 OK` - Totals by role and recent registrations
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/users/stats",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Successfully retrieved statistics", body = UserStatsDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Admin])
        .await?;

    let stats = UserService::new(&state.db).stats().await?;

    Ok((StatusCode::OK, Json(stats.into_dto())))
}

/// Get a user account.
///
/// # Access Control
/// - `Admin` - Any account
/// - Authenticated - Own account only
///
/// # Returns
/// - `200 OK` - The user
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Another user's account without admin role
/// - `404 Not Found` - Unknown user
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Successfully retrieved user", body = UserDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Access denied", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let user = UserService::new(&state.db).get(&actor, id).await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Update a user account.
///
/// Only fields present in the body change. A new password is re-hashed.
///
/// # Access Control
/// - `Admin` - Any account, including roles
/// - Authenticated - Own profile only, role changes are refused
///
/// # Returns
/// - `200 OK` - The updated user
/// - `400 Bad Request` - Invalid field or email already in use
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Another user's account or a role change without admin role
/// - `404 Not Found` - Unknown user
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Successfully updated user", body = UserDto),
        (status = 400, description = "Invalid user data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "Access denied", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let user = UserService::new(&state.db)
        .update(&actor, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

/// Delete a user account.
///
/// # Access Control
/// - `Admin` - Only admins can delete accounts, never their own
///
/// # Returns
/// - `200 OK` - Confirmation message
/// - `400 Bad Request` - Attempt to delete your own account
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `404 Not Found` - Unknown user
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageDto),
        (status = 400, description = "Cannot delete your own account", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let actor = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Admin])
        .await?;

    UserService::new(&state.db).delete(&actor, id).await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            message: "User deleted".to_string(),
        }),
    ))
}

/// Get the caller's favorite robots.
///
/// # Access Control
/// - Authenticated
///
/// # Returns
/// - `200 OK` - Favorite robots in the order they were added
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/users/favorites",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Successfully retrieved favorites", body = Vec<RobotDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let robots = UserService::new(&state.db).favorites(&user).await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Add a robot to the caller's favorites.
///
/// # Access Control
/// - Authenticated
///
/// # Returns
/// - `200 OK` - Updated favorite robots
/// - `400 Bad Request` - Robot already a favorite
/// - `401 Unauthorized` - Not authenticated
/// - `404 Not Found` - Unknown robot
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/users/favorites/{robot_id}",
    tag = USER_TAG,
    params(
        ("robot_id" = i32, Path, description = "Robot ID")
    ),
    responses(
        (status = 200, description = "Favorite added", body = Vec<RobotDto>),
        (status = 400, description = "Robot already in favorites", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(robot_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let robots = UserService::new(&state.db)
        .add_favorite(&user, robot_id)
        .await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Remove a robot from the caller's favorites.
///
/// # Access Control
/// - Authenticated
///
/// # Returns
/// - `200 OK` - Updated favorite robots
/// - `400 Bad Request` - Robot is not a favorite
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    delete,
    path = "/api/users/favorites/{robot_id}",
    tag = USER_TAG,
    params(
        ("robot_id" = i32, Path, description = "Robot ID")
    ),
    responses(
        (status = 200, description = "Favorite removed", body = Vec<RobotDto>),
        (status = 400, description = "Robot not in favorites", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(robot_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let robots = UserService::new(&state.db)
        .remove_favorite(&user, robot_id)
        .await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Get the caller's recently viewed robots.
///
/// # Access Control
/// - Authenticated
///
/// # Returns
/// - `200 OK` - Up to ten robots, most recent first
/// - `401 Unauthorized` - Not authenticated
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/users/recent",
    tag = USER_TAG,
    responses(
        (status = 200, description = "Successfully retrieved recently viewed robots", body = Vec<RobotDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_recent(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let robots = UserService::new(&state.db).recent(&user).await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Record a robot view for the caller.
///
/// # Access Control
/// - Authenticated
///
/// # Returns
/// - `200 OK` - Updated recently viewed robots
/// - `401 Unauthorized` - Not authenticated
/// - `404 Not Found` - Unknown robot
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/users/recent/{robot_id}",
    tag = USER_TAG,
    params(
        ("robot_id" = i32, Path, description = "Robot ID")
    ),
    responses(
        (status = 200, description = "View recorded", body = Vec<RobotDto>),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn add_recent(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(robot_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[])
        .await?;

    let robots = UserService::new(&state.db)
        .add_recent(&user, robot_id)
        .await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}
