//! User data repository for database operations.
//!
//! This module provides the `UserRepository` for managing accounts: registration,
//! lookups by ID, email and reset token, profile updates, listings, role statistics
//! and the per-user favorite and recently viewed lists.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{
    model::user::{PreferencesDto, RecentlyViewedDto, Role},
    server::{
        data::contains_pattern,
        error::AppError,
        model::user::{
            CreateUserParams, PaginatedUsers, UpdateUserParams, User, UserFilter, UserStats,
        },
    },
};

/// Repository providing database operations for user accounts.
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new account with default preferences and empty activity lists.
    ///
    /// The email is stored lowercase.
    ///
    /// # Returns
    /// - `Ok(User)` - The created user
    /// - `Err(AppError::DbErr)` - Insert failed (including an email unique violation)
    pub async fn create(
        &self,
        params: CreateUserParams,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let entity = entity::user::ActiveModel {
            email: ActiveValue::Set(params.email.trim().to_lowercase()),
            password_hash: ActiveValue::Set(params.password_hash),
            first_name: ActiveValue::Set(params.first_name),
            last_name: ActiveValue::Set(params.last_name),
            role: ActiveValue::Set(params.role.as_str().to_string()),
            profile_image: ActiveValue::Set(None),
            preferences: ActiveValue::Set(serde_json::to_value(PreferencesDto::default())?),
            favorite_robots: ActiveValue::Set(serde_json::json!([])),
            recently_viewed: ActiveValue::Set(serde_json::json!([])),
            reset_password_token: ActiveValue::Set(None),
            reset_password_expires: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            last_login: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        User::from_entity(entity)
    }

    /// Finds a user by ID.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - User found
    /// - `Ok(None)` - No user with that ID
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        entity::prelude::User::find_by_id(id)
            .one(self.db)
            .await?
            .map(User::from_entity)
            .transpose()
    }

    /// Finds a user by email, ignoring case.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await?
            .map(User::from_entity)
            .transpose()
    }

    /// Finds the user holding an unexpired password reset token.
    ///
    /// # Arguments
    /// - `token_hash` - SHA-256 hex digest of the token the user presented
    /// - `now` - Current time; tokens expiring at or before it are ignored
    ///
    /// # Returns
    /// - `Ok(Some(User))` - Token matches and has not expired
    /// - `Ok(None)` - Unknown or expired token
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        entity::prelude::User::find()
            .filter(entity::user::Column::ResetPasswordToken.eq(token_hash))
            .filter(entity::user::Column::ResetPasswordExpires.gt(now))
            .one(self.db)
            .await?
            .map(User::from_entity)
            .transpose()
    }

    /// Checks whether an email is registered to a user other than `exclude_id`.
    pub async fn email_exists(
        &self,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, AppError> {
        let mut query = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()));
        if let Some(id) = exclude_id {
            query = query.filter(entity::user::Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Applies a partial profile update.
    ///
    /// # Returns
    /// - `Ok(Some(User))` - The updated user
    /// - `Ok(None)` - No user with that ID
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn update(&self, params: UpdateUserParams) -> Result<Option<User>, AppError> {
        let Some(existing) = entity::prelude::User::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::user::ActiveModel = existing.into();

        if let Some(email) = params.email {
            active.email = ActiveValue::Set(email.trim().to_lowercase());
        }
        if let Some(first_name) = params.first_name {
            active.first_name = ActiveValue::Set(first_name);
        }
        if let Some(last_name) = params.last_name {
            active.last_name = ActiveValue::Set(last_name);
        }
        if let Some(role) = params.role {
            active.role = ActiveValue::Set(role.as_str().to_string());
        }
        if let Some(profile_image) = params.profile_image {
            active.profile_image = ActiveValue::Set(Some(profile_image));
        }
        if let Some(preferences) = params.preferences {
            active.preferences = ActiveValue::Set(serde_json::to_value(preferences)?);
        }
        if let Some(password_hash) = params.password_hash {
            active.password_hash = ActiveValue::Set(password_hash);
        }

        let entity = active.update(self.db).await?;

        Ok(Some(User::from_entity(entity)?))
    }

    /// Stamps the last login time.
    pub async fn set_last_login(&self, id: i32, now: DateTime<Utc>) -> Result<(), AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::LastLogin,
                sea_orm::sea_query::Expr::value(Some(now)),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Stores or clears the password reset token hash and its expiry.
    ///
    /// # Arguments
    /// - `id` - User ID
    /// - `token` - `Some((hash, expires))` to store, `None` to clear
    pub async fn set_reset_token(
        &self,
        id: i32,
        token: Option<(String, DateTime<Utc>)>,
    ) -> Result<(), AppError> {
        let (hash, expires) = token.unzip();

        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::ResetPasswordToken,
                sea_orm::sea_query::Expr::value(hash),
            )
            .col_expr(
                entity::user::Column::ResetPasswordExpires,
                sea_orm::sea_query::Expr::value(expires),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Replaces a user's favorite robot list.
    pub async fn set_favorites(&self, id: i32, favorites: &[i32]) -> Result<(), AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::FavoriteRobots,
                sea_orm::sea_query::Expr::value(serde_json::to_value(favorites)?),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Replaces a user's recently viewed list.
    pub async fn set_recently_viewed(
        &self,
        id: i32,
        entries: &[RecentlyViewedDto],
    ) -> Result<(), AppError> {
        entity::prelude::User::update_many()
            .filter(entity::user::Column::Id.eq(id))
            .col_expr(
                entity::user::Column::RecentlyViewed,
                sea_orm::sea_query::Expr::value(serde_json::to_value(entries)?),
            )
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Deletes a user.
    ///
    /// # Returns
    /// - `Ok(true)` - User deleted
    /// - `Ok(false)` - No user with that ID
    /// - `Err(AppError::DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = entity::prelude::User::delete_by_id(id)
            .exec(self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Gets users matching a filter with pagination, newest first.
    ///
    /// # Arguments
    /// - `filter` - Role and search constraints
    /// - `page` - 1-based page number
    /// - `per_page` - Number of users per page (at least 1)
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedUsers, AppError> {
        let mut condition = Condition::all();

        if let Some(role) = filter.role {
            condition = condition.add(entity::user::Column::Role.eq(role.as_str()));
        }
        if let Some(search) = &filter.search {
            condition = condition.add(
                Condition::any()
                    .add(entity::user::Column::Email.like(contains_pattern(search)))
                    .add(entity::user::Column::FirstName.like(contains_pattern(search)))
                    .add(entity::user::Column::LastName.like(contains_pattern(search))),
            );
        }

        let paginator = entity::prelude::User::find()
            .filter(condition)
            .order_by_desc(entity::user::Column::CreatedAt)
            .order_by_desc(entity::user::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(page.saturating_sub(1))
            .await?
            .into_iter()
            .map(User::from_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedUsers {
            users,
            total,
            page,
            pages: total.div_ceil(per_page),
        })
    }

    /// Counts accounts per role and those registered since `since`.
    pub async fn stats(&self, since: DateTime<Utc>) -> Result<UserStats, AppError> {
        let count_role = |role: Role| {
            entity::prelude::User::find()
                .filter(entity::user::Column::Role.eq(role.as_str()))
                .count(self.db)
        };

        let users = count_role(Role::User).await?;
        let editors = count_role(Role::Editor).await?;
        let admins = count_role(Role::Admin).await?;
        let recent_registrations = entity::prelude::User::find()
            .filter(entity::user::Column::CreatedAt.gte(since))
            .count(self.db)
            .await?;

        Ok(UserStats {
            total: users + editors + admins,
            users,
            editors,
            admins,
            recent_registrations,
        })
    }
}
