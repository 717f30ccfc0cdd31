//! Account administration and per-user activity lists.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::FieldErrorDto,
        user::{Role, UpdateUserDto},
    },
    server::{
        data::{robot::RobotRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        model::{
            robot::Robot,
            user::{record_view, PaginatedUsers, UpdateUserParams, User, UserFilter, UserStats},
        },
        service::auth::is_plausible_email,
        util::password::{hash_password, validate_password},
    },
};

/// Window used for the "recent registrations" statistic.
pub const RECENT_REGISTRATION_DAYS: i64 = 30;

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a page of users, newest first
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedUsers, AppError> {
        UserRepository::new(self.db)
            .list(filter, page, per_page)
            .await
    }

    pub async fn stats(&self) -> Result<UserStats, AppError> {
        let since = Utc::now() - Duration::days(RECENT_REGISTRATION_DAYS);
        UserRepository::new(self.db).stats(since).await
    }

    /// Gets a user visible to the actor.
    ///
    /// # Returns
    /// - `Ok(User)` - The user
    /// - `Err(AuthError::AccessDenied)` - Actor is neither admin nor the user
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn get(&self, actor: &User, id: i32) -> Result<User, AppError> {
        ensure_self_or_admin(actor, id)?;

        UserRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Applies a partial profile update.
    ///
    /// Admins may update anyone, other users only themselves. Only admins may change
    /// a role.
    ///
    /// # Returns
    /// - `Ok(User)` - The updated user
    /// - `Err(AuthError::AccessDenied)` - Not permitted for this actor (403)
    /// - `Err(AppError::BadRequest)` - Email already used by another account
    /// - `Err(AppError::Validation)` - Malformed email, blank name or short password
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn update(
        &self,
        actor: &User,
        id: i32,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        ensure_self_or_admin(actor, id)?;

        // Non-admins only reach here for their own account
        if actor.role != Role::Admin && dto.role.is_some_and(|role| role != actor.role) {
            return Err(AuthError::AccessDenied(
                actor.id,
                format!("attempted to change the role of user {}", id),
            )
            .into());
        }

        let user_repo = UserRepository::new(self.db);

        let mut errors = Vec::new();
        if dto.email.as_deref().is_some_and(|e| !is_plausible_email(e)) {
            errors.push(FieldErrorDto::new("email", "A valid email is required"));
        }
        if dto
            .first_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            errors.push(FieldErrorDto::new(
                "firstName",
                "First name cannot be empty",
            ));
        }
        if dto
            .last_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            errors.push(FieldErrorDto::new("lastName", "Last name cannot be empty"));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if let Some(email) = &dto.email {
            if user_repo.email_exists(email, Some(id)).await? {
                return Err(AppError::BadRequest("Email already in use".to_string()));
            }
        }

        let password_hash = match &dto.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let user = user_repo
            .update(UpdateUserParams {
                id,
                email: dto.email,
                first_name: dto.first_name.map(|n| n.trim().to_string()),
                last_name: dto.last_name.map(|n| n.trim().to_string()),
                role: dto.role,
                profile_image: dto.profile_image,
                preferences: dto.preferences,
                password_hash,
            })
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!("User {} updated user {}", actor.id, id);

        Ok(user)
    }

    /// Deletes an account on behalf of an admin.
    ///
    /// # Returns
    /// - `Ok(())` - Deleted
    /// - `Err(AppError::BadRequest)` - The admin tried to delete their own account
    /// - `Err(AppError::NotFound)` - Unknown user
    pub async fn delete(&self, actor: &User, id: i32) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }

        if !UserRepository::new(self.db).delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!("User {} deleted user {}", actor.id, id);

        Ok(())
    }

    /// Gets the user's favorite robots in the order they were added
    pub async fn favorites(&self, user: &User) -> Result<Vec<Robot>, AppError> {
        RobotRepository::new(self.db)
            .find_many(&user.favorite_robots)
            .await
    }

    /// Adds a robot to the user's favorites and bumps its favorites counter.
    ///
    /// # Returns
    /// - `Ok(Vec<Robot>)` - Updated favorites
    /// - `Err(AppError::NotFound)` - Unknown robot
    /// - `Err(AppError::BadRequest)` - Robot already a favorite
    pub async fn add_favorite(&self, user: &User, robot_id: i32) -> Result<Vec<Robot>, AppError> {
        let robot_repo = RobotRepository::new(self.db);

        if robot_repo.find_by_id(robot_id).await?.is_none() {
            return Err(AppError::NotFound("Robot not found".to_string()));
        }
        if user.favorite_robots.contains(&robot_id) {
            return Err(AppError::BadRequest(
                "Robot already in favorites".to_string(),
            ));
        }

        let mut favorites = user.favorite_robots.clone();
        favorites.push(robot_id);

        UserRepository::new(self.db)
            .set_favorites(user.id, &favorites)
            .await?;
        robot_repo.adjust_favorites(robot_id, 1).await?;

        robot_repo.find_many(&favorites).await
    }

    /// Removes a robot from the user's favorites and decrements its counter.
    ///
    /// # Returns
    /// - `Ok(Vec<Robot>)` - Updated favorites
    /// - `Err(AppError::BadRequest)` - Robot is not a favorite
    pub async fn remove_favorite(
        &self,
        user: &User,
        robot_id: i32,
    ) -> Result<Vec<Robot>, AppError> {
        if !user.favorite_robots.contains(&robot_id) {
            return Err(AppError::BadRequest("Robot not in favorites".to_string()));
        }

        let favorites: Vec<i32> = user
            .favorite_robots
            .iter()
            .copied()
            .filter(|id| *id != robot_id)
            .collect();

        let robot_repo = RobotRepository::new(self.db);

        UserRepository::new(self.db)
            .set_favorites(user.id, &favorites)
            .await?;
        robot_repo.adjust_favorites(robot_id, -1).await?;

        robot_repo.find_many(&favorites).await
    }

    /// Gets the user's recently viewed robots, most recent first
    pub async fn recent(&self, user: &User) -> Result<Vec<Robot>, AppError> {
        let ids: Vec<i32> = user.recently_viewed.iter().map(|e| e.robot).collect();
        RobotRepository::new(self.db).find_many(&ids).await
    }

    /// Records a robot view in the user's recently viewed list.
    ///
    /// # Returns
    /// - `Ok(Vec<Robot>)` - Updated recently viewed robots
    /// - `Err(AppError::NotFound)` - Unknown robot
    pub async fn add_recent(&self, user: &User, robot_id: i32) -> Result<Vec<Robot>, AppError> {
        let robot_repo = RobotRepository::new(self.db);

        if robot_repo.find_by_id(robot_id).await?.is_none() {
            return Err(AppError::NotFound("Robot not found".to_string()));
        }

        let mut entries = user.recently_viewed.clone();
        record_view(&mut entries, robot_id, Utc::now());

        UserRepository::new(self.db)
            .set_recently_viewed(user.id, &entries)
            .await?;

        let ids: Vec<i32> = entries.iter().map(|e| e.robot).collect();
        robot_repo.find_many(&ids).await
    }
}

fn ensure_self_or_admin(actor: &User, id: i32) -> Result<(), AppError> {
    if actor.id == id || actor.role == Role::Admin {
        return Ok(());
    }

    Err(AuthError::AccessDenied(actor.id, format!("attempted to access user {}", id)).into())
}
