//! Service layer for business logic and orchestration.
//!
//! Services sit between the controllers and the repositories. They enforce the
//! business rules (slug generation, ownership checks, favorites bookkeeping), work
//! with domain models rather than DTOs or entities, and coordinate media storage
//! and outbound API calls.

pub mod auth;
pub mod export;
pub mod robot;
pub mod token;
pub mod user;
