pub use super::robot::Entity as Robot;
pub use super::robot_category::Entity as RobotCategory;
pub use super::user::Entity as User;
