//! Wire types exchanged with API clients.
//!
//! Every request and response body of the REST surface is defined here. Field
//! names are serialized in camelCase to match the JSON the admin dashboard and the
//! public site consume.

pub mod api;
pub mod auth;
pub mod robot;
pub mod user;
