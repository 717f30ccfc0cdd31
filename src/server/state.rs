//! Application state shared across all request handlers.
//!
//! The state is built once at startup and cloned into each handler through Axum's
//! state extraction. Every field is cheap to clone: the database handle is a pool,
//! the configuration and storage sit behind `Arc`, and `reqwest::Client` is
//! reference counted internally.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{config::Config, service::token::TokenService, storage::MediaStorage};

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,

    pub config: Arc<Config>,

    /// Issues and verifies bearer tokens.
    pub tokens: TokenService,

    /// Backend for uploaded robot media.
    pub storage: Arc<dyn MediaStorage>,

    /// HTTP client for the GitHub contents API.
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Creates the application state.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Loaded configuration; the token service is derived from it
    /// - `storage` - Media storage backend
    /// - `http_client` - HTTP client for outbound API requests
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        storage: Arc<dyn MediaStorage>,
        http_client: reqwest::Client,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiry_hours);

        Self {
            db,
            config: Arc::new(config),
            tokens,
            storage,
            http_client,
        }
    }
}
