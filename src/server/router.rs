use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Config,
    controller::{
        auth::{
            __path_forgot_password, __path_get_me, __path_init_admin, __path_login, __path_logout,
            __path_register, __path_reset_password, forgot_password, get_me, init_admin, login,
            logout, register, reset_password,
        },
        robot::{
            __path_create_robot, __path_delete_robot, __path_export_robots, __path_get_categories,
            __path_get_popular, __path_get_related, __path_get_robot, __path_get_stats,
            __path_import_robots, __path_list_robots, __path_publish_export, __path_update_robot,
            create_robot, delete_robot, export_robots, get_categories, get_popular, get_related,
            get_robot, get_stats, import_robots, list_robots, publish_export, update_robot,
        },
        user::{
            __path_add_favorite, __path_add_recent, __path_delete_user, __path_get_favorites,
            __path_get_recent, __path_get_user, __path_get_user_stats, __path_list_users,
            __path_remove_favorite, __path_update_user, add_favorite, add_recent, delete_user,
            get_favorites, get_recent, get_user, get_user_stats, list_users, remove_favorite,
            update_user,
        },
    },
    error::{config::ConfigError, AppError},
    state::AppState,
    storage::UPLOADS_PREFIX,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Robopedia API", description = "Robot encyclopedia backend"),
    tags(
        (name = "robot", description = "Robot catalog"),
        (name = "user", description = "User accounts, favorites and history"),
        (name = "auth", description = "Login, registration and password reset")
    )
)]
struct ApiDoc;

/// Builds the API router with OpenAPI docs, static files and cross-cutting layers.
///
/// Uploaded media is served under `/uploads`; any other unmatched path falls back to
/// the static asset directory. The session layer is attached by the caller.
///
/// # Returns
/// - `Ok(Router)` - Router awaiting its state
/// - `Err(AppError::ConfigErr)` - `CORS_ORIGIN` is not a valid header value
pub fn router(config: &Config) -> Result<Router<AppState>, AppError> {
    let (api_router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(list_robots, create_robot))
        .routes(routes!(get_categories))
        .routes(routes!(get_popular))
        .routes(routes!(get_stats))
        .routes(routes!(export_robots))
        .routes(routes!(import_robots))
        .routes(routes!(publish_export))
        .routes(routes!(get_robot, update_robot, delete_robot))
        .routes(routes!(get_related))
        .routes(routes!(list_users))
        .routes(routes!(get_user_stats))
        .routes(routes!(get_favorites))
        .routes(routes!(add_favorite, remove_favorite))
        .routes(routes!(get_recent))
        .routes(routes!(add_recent))
        .routes(routes!(get_user, update_user, delete_user))
        .routes(routes!(login))
        .routes(routes!(register))
        .routes(routes!(get_me))
        .routes(routes!(logout))
        .routes(routes!(forgot_password))
        .routes(routes!(reset_password))
        .routes(routes!(init_admin))
        .split_for_parts();

    let router = api_router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .nest_service(UPLOADS_PREFIX, ServeDir::new(&config.upload_dir))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

/// Allows any origin unless `CORS_ORIGIN` pins one, in which case cookies are allowed too.
fn cors_layer(config: &Config) -> Result<CorsLayer, AppError> {
    let Some(origin) = config.cors_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };

    let origin = HeaderValue::from_str(origin)
        .map_err(|e| ConfigError::InvalidEnvVar("CORS_ORIGIN".to_string(), e.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true))
}
