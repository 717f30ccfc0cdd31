//! Robopedia Test Utils
//!
//! Shared helpers for the server's unit and integration tests: a builder that creates
//! in-memory SQLite databases from entity definitions, a context holding the database
//! and a session, and factories inserting users and robots with sensible defaults.
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn lists_published_robots() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_robot_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let robot = factory::robot::RobotFactory::new(db).published().build().await?;
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
