//! SeaORM entity definitions for the robot catalog.

pub mod prelude;

pub mod robot;
pub mod robot_category;
pub mod user;
