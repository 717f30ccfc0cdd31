//! User domain models and parameters.
//!
//! Provides the account domain model with its decoded preference and activity
//! documents, plus parameter types for registration, profile updates and listings.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{
        PaginatedUsersDto, PreferencesDto, RecentlyViewedDto, Role, RoleCountsDto, UserDto,
        UserStatsDto,
    },
    server::error::AppError,
};

/// Maximum number of entries kept in a user's recently viewed list.
pub const MAX_RECENTLY_VIEWED: usize = 10;

/// Account with role and activity lists.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub preferences: PreferencesDto,
    /// Favorite robot IDs in the order they were added.
    pub favorite_robots: Vec<i32>,
    /// Most recent first, at most [`MAX_RECENTLY_VIEWED`] entries.
    pub recently_viewed: Vec<RecentlyViewedDto>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// # Returns
    /// - `Ok(User)` - The converted user domain model
    /// - `Err(AppError::InternalError)` - Stored role is not a known value
    /// - `Err(AppError::JsonErr)` - A stored activity document is malformed
    pub fn from_entity(entity: entity::user::Model) -> Result<Self, AppError> {
        let role = entity.role.parse::<Role>().map_err(|e| {
            AppError::InternalError(format!("User {} has invalid role: {}", entity.id, e))
        })?;

        Ok(Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            first_name: entity.first_name,
            last_name: entity.last_name,
            role,
            profile_image: entity.profile_image,
            preferences: serde_json::from_value(entity.preferences)?,
            favorite_robots: serde_json::from_value(entity.favorite_robots)?,
            recently_viewed: serde_json::from_value(entity.recently_viewed)?,
            created_at: entity.created_at,
            last_login: entity.last_login,
        })
    }

    /// Converts the user domain model to a DTO. The password hash never leaves the server.
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            profile_image: self.profile_image,
            preferences: self.preferences,
            favorite_robots: self.favorite_robots,
            recently_viewed: self.recently_viewed,
            created_at: self.created_at,
            last_login: self.last_login,
        }
    }
}

/// Moves or inserts `robot_id` at the front of a recently viewed list.
///
/// Existing entries for the robot are removed first, so the list never holds
/// duplicates, and the list is truncated to [`MAX_RECENTLY_VIEWED`].
pub fn record_view(entries: &mut Vec<RecentlyViewedDto>, robot_id: i32, viewed_at: DateTime<Utc>) {
    entries.retain(|entry| entry.robot != robot_id);
    entries.insert(
        0,
        RecentlyViewedDto {
            robot: robot_id,
            viewed_at,
        },
    );
    entries.truncate(MAX_RECENTLY_VIEWED);
}

/// Parameters for inserting a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Parameters for a partial account update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub id: i32,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub profile_image: Option<String>,
    pub preferences: Option<PreferencesDto>,
    pub password_hash: Option<String>,
}

/// Filter for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Substring matched against email, first name and last name.
    pub search: Option<String>,
}

/// Page of users with pagination metadata. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl PaginatedUsers {
    pub fn into_dto(self) -> PaginatedUsersDto {
        PaginatedUsersDto {
            users: self.users.into_iter().map(User::into_dto).collect(),
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}

/// Account statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub total: u64,
    pub users: u64,
    pub editors: u64,
    pub admins: u64,
    pub recent_registrations: u64,
}

impl UserStats {
    pub fn into_dto(self) -> UserStatsDto {
        UserStatsDto {
            total: self.total,
            by_role: RoleCountsDto {
                user: self.users,
                editor: self.editors,
                admin: self.admins,
            },
            recent_registrations: self.recent_registrations,
        }
    }
}
