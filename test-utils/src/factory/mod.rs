//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` builder for customization and a `create_*` shorthand
//! for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let user = factory::create_user(&db).await?;
//! let admin = factory::user::UserFactory::new(&db).role("admin").build().await?;
//! let robot = factory::robot::RobotFactory::new(&db)
//!     .name("Atlas")
//!     .published()
//!     .categories(&["Humanoid"])
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create user accounts
//! - `robot` - Create robots with their category rows

pub mod helpers;
pub mod robot;
pub mod user;

pub use robot::create_robot;
pub use user::create_user;
