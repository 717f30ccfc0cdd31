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
        robot::{
            CategoryCountDto, GithubExportResultDto, ImportResultDto, PaginatedRobotsDto, RobotDto,
            RobotExportDto, RobotImportDto, RobotInputDto, RobotReportDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::robot::{Robot, RobotFilter},
        service::{
            export::{ExportService, GithubPublisher},
            robot::RobotService,
        },
        state::AppState,
        util::{
            form::RobotForm,
            parse::{is_truthy, page_bounds},
        },
    },
};

/// Tag for grouping robot endpoints in OpenAPI documentation
pub static ROBOT_TAG: &str = "robot";

#[derive(Deserialize)]
pub struct RobotListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub manufacturer: Option<String>,
    pub search: Option<String>,
    pub admin: Option<String>,
}

#[derive(Deserialize)]
pub struct AdminViewParams {
    pub admin: Option<String>,
}

#[derive(Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRobotQuery {
    pub replace_images: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteRobotQuery {
    pub soft: Option<String>,
}

/// Whether the request may see drafts and archived robots.
///
/// The view is only granted when asked for with `?admin=true` and the caller is an
/// editor or admin; anyone else silently gets the public view.
async fn admin_view(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
    requested: Option<&str>,
) -> Result<bool, AppError> {
    if !is_truthy(requested) {
        return Ok(false);
    }

    let user = AuthGuard::new(state, headers, session).identify().await?;

    Ok(user.is_some_and(|u| u.role.can_edit_robots()))
}

pub(super) fn robot_dtos(robots: Vec<Robot>) -> Vec<RobotDto> {
    robots.into_iter().map(Robot::into_dto).collect()
}

/// List robots.
///
/// Returns a page of robots, newest first, optionally filtered by category,
/// manufacturer or free text search. Only published robots are listed unless an
/// editor or admin asks for the admin view.
///
/// # Access Control
/// - Public
/// - `Editor` - May pass `admin=true` to include drafts and archived robots
///
/// # Returns
/// - `200 OK` - Page of robots with totals
/// - `401 Unauthorized` - A supplied token is invalid
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots",
    tag = ROBOT_TAG,
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-based (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Robots per page (default: 10, max: 100)"),
        ("category" = Option<String>, Query, description = "Exact category name"),
        ("manufacturer" = Option<String>, Query, description = "Manufacturer name substring"),
        ("search" = Option<String>, Query, description = "Free text search"),
        ("admin" = Option<bool>, Query, description = "Include unpublished robots (editors and admins)")
    ),
    responses(
        (status = 200, description = "Successfully retrieved robots", body = PaginatedRobotsDto),
        (status = 401, description = "Invalid token", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_robots(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Query(params): Query<RobotListParams>,
) -> Result<impl IntoResponse, AppError> {
    let admin = admin_view(&state, &headers, &session, params.admin.as_deref()).await?;
    let (page, limit) = page_bounds(params.page, params.limit);

    let filter = RobotFilter {
        category: params.category.filter(|c| !c.trim().is_empty()),
        manufacturer: params.manufacturer.filter(|m| !m.trim().is_empty()),
        search: params.search.filter(|s| !s.trim().is_empty()),
        published_only: !admin,
    };

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robots = service.list(&filter, page, limit).await?;

    Ok((StatusCode::OK, Json(robots.into_dto())))
}

/// Get a robot by ID or slug.
///
/// An all-digit parameter is tried as an ID before falling back to a slug. Public
/// fetches count as a view; the counter is updated in the background.
///
/// # Access Control
/// - Public for published robots
/// - `Editor` - May pass `admin=true` to fetch unpublished robots
///
/// # Returns
/// - `200 OK` - The robot
/// - `404 Not Found` - Unknown robot, or not published
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/{id}",
    tag = ROBOT_TAG,
    params(
        ("id" = String, Path, description = "Robot ID or slug"),
        ("admin" = Option<bool>, Query, description = "Admin view (editors and admins)")
    ),
    responses(
        (status = 200, description = "Successfully retrieved robot", body = RobotDto),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_robot(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id_or_slug): Path<String>,
    Query(params): Query<AdminViewParams>,
) -> Result<impl IntoResponse, AppError> {
    let admin = admin_view(&state, &headers, &session, params.admin.as_deref()).await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robot = service.get(&id_or_slug, admin).await?;

    if !admin {
        RobotService::spawn_view_increment(state.db.clone(), robot.id);
    }

    Ok((StatusCode::OK, Json(robot.into_dto())))
}

/// Create a robot.
///
/// Accepts `multipart/form-data` with optional `featuredImage`, `images` and `videos`
/// file parts, or a JSON body. Structured text fields may be JSON-encoded.
///
/// # Access Control
/// - `Editor` - Editors and admins can create robots
///
/// # Returns
/// - `201 Created` - The created robot
/// - `400 Bad Request` - Missing name or manufacturer, invalid field or duplicate slug
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an editor or admin
/// - `500 Internal Server Error` - Database or storage error
#[utoipa::path(
    post,
    path = "/api/robots",
    tag = ROBOT_TAG,
    request_body(content = RobotInputDto, description = "Robot fields, as JSON or multipart form"),
    responses(
        (status = 201, description = "Successfully created robot", body = RobotDto),
        (status = 400, description = "Invalid robot data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an editor or admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_robot(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    form: RobotForm,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Editor])
        .await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robot = service.create(form, user.id).await?;

    Ok((StatusCode::CREATED, Json(robot.into_dto())))
}

/// Update a robot.
///
/// Merges the fields present in the request into the robot. Uploaded gallery images
/// are appended unless `replaceImages=true`.
///
/// # Access Control
/// - `Editor` - Editors and admins can update robots
///
/// # Returns
/// - `200 OK` - The updated robot
/// - `400 Bad Request` - Invalid field
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an editor or admin
/// - `404 Not Found` - Unknown robot
/// - `500 Internal Server Error` - Database or storage error
#[utoipa::path(
    put,
    path = "/api/robots/{id}",
    tag = ROBOT_TAG,
    params(
        ("id" = i32, Path, description = "Robot ID"),
        ("replaceImages" = Option<bool>, Query, description = "Replace the gallery instead of appending")
    ),
    request_body(content = RobotInputDto, description = "Fields to change, as JSON or multipart form"),
    responses(
        (status = 200, description = "Successfully updated robot", body = RobotDto),
        (status = 400, description = "Invalid robot data", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an editor or admin", body = ErrorDto),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_robot(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id): Path<i32>,
    Query(query): Query<UpdateRobotQuery>,
    form: RobotForm,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Editor])
        .await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robot = service
        .update(
            id,
            form,
            is_truthy(query.replace_images.as_deref()),
            user.id,
        )
        .await?;

    Ok((StatusCode::OK, Json(robot.into_dto())))
}

/// Delete or archive a robot.
///
/// With `soft=true` the robot is archived and returned. Otherwise the robot, its
/// categories and its stored media are removed.
///
/// # Access Control
/// - `Editor` - Editors and admins can delete robots
///
/// # Returns
/// - `200 OK` - Archived robot, or a confirmation message
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an editor or admin
/// - `404 Not Found` - Unknown robot
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    delete,
    path = "/api/robots/{id}",
    tag = ROBOT_TAG,
    params(
        ("id" = i32, Path, description = "Robot ID"),
        ("soft" = Option<bool>, Query, description = "Archive instead of deleting")
    ),
    responses(
        (status = 200, description = "Robot archived or deleted", body = RobotDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an editor or admin", body = ErrorDto),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_robot(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id): Path<i32>,
    Query(query): Query<DeleteRobotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Editor])
        .await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let archived = service
        .delete(id, is_truthy(query.soft.as_deref()), user.id)
        .await?;

    let response = match archived {
        Some(robot) => Json(robot.into_dto()).into_response(),
        None => Json(MessageDto {
            message: "Robot deleted".to_string(),
        })
        .into_response(),
    };

    Ok((StatusCode::OK, response))
}

/// Get the category histogram of published robots.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Categories with robot counts, most used first
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/categories",
    tag = ROBOT_TAG,
    responses(
        (status = 200, description = "Successfully retrieved categories", body = Vec<CategoryCountDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let service = RobotService::new(&state.db, state.storage.as_ref());
    let categories = service.categories().await?;

    let dtos: Vec<CategoryCountDto> = categories.into_iter().map(|c| c.into_dto()).collect();

    Ok((StatusCode::OK, Json(dtos)))
}

/// Get the most viewed published robots.
///
/// # Access Control
/// - Public
///
/// # Returns
/// - `200 OK` - Robots, most viewed first
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/popular",
    tag = ROBOT_TAG,
    params(
        ("limit" = Option<u64>, Query, description = "Number of robots (default: 5, max: 50)")
    ),
    responses(
        (status = 200, description = "Successfully retrieved popular robots", body = Vec<RobotDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_popular(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robots = service.popular(params.limit).await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Get published robots sharing a category with a robot.
///
/// # Access Control
/// - Public for published robots
/// - `Editor` - May pass `admin=true` to look up an unpublished robot
///
/// # Returns
/// - `200 OK` - Up to three related robots
/// - `404 Not Found` - Unknown robot, or not published
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/{id}/related",
    tag = ROBOT_TAG,
    params(
        ("id" = String, Path, description = "Robot ID or slug"),
        ("admin" = Option<bool>, Query, description = "Admin view (editors and admins)")
    ),
    responses(
        (status = 200, description = "Successfully retrieved related robots", body = Vec<RobotDto>),
        (status = 404, description = "Robot not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_related(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Path(id_or_slug): Path<String>,
    Query(params): Query<AdminViewParams>,
) -> Result<impl IntoResponse, AppError> {
    let admin = admin_view(&state, &headers, &session, params.admin.as_deref()).await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let robots = service.related(&id_or_slug, admin).await?;

    Ok((StatusCode::OK, Json(robot_dtos(robots))))
}

/// Get catalog statistics for the dashboard.
///
/// # Access Control
/// - `Editor` - Editors and admins can view statistics
///
/// # Returns
/// - `200 OK` - Totals, category histogram, most viewed and newest robots
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an editor or admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/stats",
    tag = ROBOT_TAG,
    responses(
        (status = 200, description = "Successfully retrieved statistics", body = RobotReportDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an editor or admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Editor])
        .await?;

    let service = RobotService::new(&state.db, state.storage.as_ref());
    let report = service.stats().await?;

    Ok((StatusCode::OK, Json(report.into_dto())))
}

/// Export the whole catalog.
///
/// # Access Control
/// - `Editor` - Editors and admins can export
///
/// # Returns
/// - `200 OK` - Export document with every robot
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an editor or admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    get,
    path = "/api/robots/export",
    tag = ROBOT_TAG,
    responses(
        (status = 200, description = "Export document", body = RobotExportDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an editor or admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn export_robots(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Editor])
        .await?;

    let doc = ExportService::new(&state.db).export().await?;

    Ok((StatusCode::OK, Json(doc)))
}

/// Import robots from an export document.
///
/// Robots are matched by slug: existing ones are updated, others created.
///
/// # Access Control
/// - `Admin` - Only admins can import
///
/// # Returns
/// - `200 OK` - Created, updated and skipped counts
/// - `400 Bad Request` - Body is not an import document
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `500 Internal Server Error` - Database error
#[utoipa::path(
    post,
    path = "/api/robots/import",
    tag = ROBOT_TAG,
    request_body = RobotImportDto,
    responses(
        (status = 200, description = "Import finished", body = ImportResultDto),
        (status = 400, description = "Invalid import document", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn import_robots(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
    Json(payload): Json<RobotImportDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Admin])
        .await?;

    let result = ExportService::new(&state.db)
        .import(payload, user.id)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}

/// Publish the catalog export to the configured GitHub repository.
///
/// # Access Control
/// - `Admin` - Only admins can publish
///
/// # Returns
/// - `200 OK` - Path and commit of the written file
/// - `400 Bad Request` - GitHub publishing is not configured
/// - `401 Unauthorized` - Not authenticated
/// - `403 Forbidden` - Not an admin
/// - `409 Conflict` - The file changed on GitHub while exporting
/// - `500 Internal Server Error` - Database or GitHub error
#[utoipa::path(
    post,
    path = "/api/robots/export/github",
    tag = ROBOT_TAG,
    responses(
        (status = 200, description = "Export published", body = GithubExportResultDto),
        (status = 400, description = "GitHub publishing not configured", body = ErrorDto),
        (status = 401, description = "User not authenticated", body = ErrorDto),
        (status = 403, description = "User is not an admin", body = ErrorDto),
        (status = 409, description = "Export file changed on GitHub", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn publish_export(
    State(state): State<AppState>,
    headers: HeaderMap,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state, &headers, &session)
        .require(&[Permission::Admin])
        .await?;

    let Some(github) = state.config.github.as_ref() else {
        return Err(AppError::BadRequest(
            "GitHub export is not configured".to_string(),
        ));
    };

    let doc = ExportService::new(&state.db).export().await?;
    let result = GithubPublisher::new(&state.http_client, github)
        .publish(&doc)
        .await?;

    Ok((StatusCode::OK, Json(result)))
}
