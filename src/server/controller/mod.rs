//! HTTP request handlers.
//!
//! Controllers resolve the caller through [`AuthGuard`](crate::server::middleware::auth::AuthGuard),
//! convert request bodies into service parameters and service results into DTOs.

pub mod auth;
pub mod robot;
pub mod user;
