//! Robot data repository for database operations.
//!
//! This module provides the `RobotRepository` for managing catalog entries. Robots are
//! stored across two tables: the `robot` row holding scalar columns and JSON documents,
//! and `robot_category` rows holding the category set. The repository keeps both in
//! step and converts rows to domain models at the boundary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::robot::RobotStatus,
    server::{
        data::contains_pattern,
        error::AppError,
        model::robot::{
            CategoryCount, CreateRobotParams, PaginatedRobots, Robot, RobotFilter,
            UpdateRobotParams,
        },
    },
};

/// Repository providing database operations for robots and their categories.
pub struct RobotRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RobotRepository<'a> {
    /// Creates a new RobotRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `RobotRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new robot together with its categories.
    ///
    /// Creation and update timestamps are both set to `now`, and the creator is also
    /// recorded as the last editor.
    ///
    /// # Arguments
    /// - `params` - Robot fields, slug already resolved
    /// - `now` - Timestamp to stamp on the row
    ///
    /// # Returns
    /// - `Ok(Robot)` - The created robot
    /// - `Err(AppError::DbErr)` - Insert failed (including a slug unique violation)
    pub async fn create(
        &self,
        params: CreateRobotParams,
        now: DateTime<Utc>,
    ) -> Result<Robot, AppError> {
        let entity = entity::robot::ActiveModel {
            slug: ActiveValue::Set(params.slug),
            name: ActiveValue::Set(params.name),
            manufacturer_name: ActiveValue::Set(params.manufacturer.name),
            manufacturer_country: ActiveValue::Set(params.manufacturer.country),
            manufacturer_website: ActiveValue::Set(params.manufacturer.website),
            year_introduced: ActiveValue::Set(params.year_introduced),
            summary: ActiveValue::Set(params.summary),
            description: ActiveValue::Set(params.description),
            specifications: ActiveValue::Set(serde_json::to_value(&params.specifications)?),
            featured_image: ActiveValue::Set(
                params
                    .featured_image
                    .as_ref()
                    .map(serde_json::to_value)
                    .transpose()?,
            ),
            images: ActiveValue::Set(serde_json::to_value(&params.images)?),
            videos: ActiveValue::Set(serde_json::to_value(&params.videos)?),
            applications: ActiveValue::Set(serde_json::to_value(&params.applications)?),
            reviews: ActiveValue::Set(serde_json::to_value(&params.reviews)?),
            status: ActiveValue::Set(params.status.as_str().to_string()),
            views: ActiveValue::Set(0),
            favorites: ActiveValue::Set(0),
            created_by: ActiveValue::Set(params.created_by),
            updated_by: ActiveValue::Set(params.created_by),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        let categories = self.set_categories(entity.id, params.categories).await?;

        Robot::from_entity(entity, categories)
    }

    /// Finds a robot by its numeric ID.
    ///
    /// # Returns
    /// - `Ok(Some(Robot))` - Robot found
    /// - `Ok(None)` - No robot with that ID
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Robot>, AppError> {
        let Some(entity) = entity::prelude::Robot::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![entity]).await?.pop())
    }

    /// Finds a robot by its slug.
    ///
    /// # Returns
    /// - `Ok(Some(Robot))` - Robot found
    /// - `Ok(None)` - No robot with that slug
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Robot>, AppError> {
        let Some(entity) = entity::prelude::Robot::find()
            .filter(entity::robot::Column::Slug.eq(slug))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![entity]).await?.pop())
    }

    /// Checks whether a slug is taken by a robot other than `exclude_id`.
    ///
    /// # Arguments
    /// - `slug` - Slug to check
    /// - `exclude_id` - Robot allowed to hold the slug (the one being updated)
    ///
    /// # Returns
    /// - `Ok(true)` - Another robot already uses the slug
    /// - `Ok(false)` - Slug is free
    /// - `Err(AppError::DbErr)` - Database error during count query
    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, AppError> {
        let mut query = entity::prelude::Robot::find().filter(entity::robot::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(entity::robot::Column::Id.ne(id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    /// Gets robots matching a filter with pagination, newest first.
    ///
    /// # Arguments
    /// - `filter` - Category, manufacturer, search and visibility constraints
    /// - `page` - 1-based page number
    /// - `per_page` - Number of robots per page (at least 1)
    ///
    /// # Returns
    /// - `Ok(PaginatedRobots)` - Requested page with totals
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn list(
        &self,
        filter: &RobotFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedRobots, AppError> {
        let mut condition = Condition::all();

        if filter.published_only {
            condition =
                condition.add(entity::robot::Column::Status.eq(RobotStatus::Published.as_str()));
        }
        if let Some(category) = &filter.category {
            let ids = self.robot_ids_in_categories(&[category.clone()]).await?;
            condition = condition.add(entity::robot::Column::Id.is_in(ids));
        }
        if let Some(manufacturer) = &filter.manufacturer {
            // SQLite LIKE is case-insensitive for ASCII
            condition = condition
                .add(entity::robot::Column::ManufacturerName.like(contains_pattern(manufacturer)));
        }
        if let Some(search) = &filter.search {
            condition = condition.add(
                Condition::any()
                    .add(entity::robot::Column::Name.like(contains_pattern(search)))
                    .add(entity::robot::Column::Summary.like(contains_pattern(search)))
                    .add(entity::robot::Column::Description.like(contains_pattern(search)))
                    .add(entity::robot::Column::ManufacturerName.like(contains_pattern(search))),
            );
        }

        let paginator = entity::prelude::Robot::find()
            .filter(condition)
            .order_by_desc(entity::robot::Column::CreatedAt)
            .order_by_desc(entity::robot::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let entities = paginator.fetch_page(page.saturating_sub(1)).await?;
        let robots = self.hydrate(entities).await?;

        Ok(PaginatedRobots {
            robots,
            total,
            page,
            pages: total.div_ceil(per_page),
        })
    }

    /// Gets every robot ordered by ID, for exports.
    pub async fn all(&self) -> Result<Vec<Robot>, AppError> {
        let entities = entity::prelude::Robot::find()
            .order_by_asc(entity::robot::Column::Id)
            .all(self.db)
            .await?;

        self.hydrate(entities).await
    }

    /// Applies a partial update to a robot.
    ///
    /// Only fields set in `params` are written. `updated_at` is always re-stamped and
    /// `updated_by` is overwritten when provided. When `categories` is set the whole
    /// category set is replaced.
    ///
    /// # Returns
    /// - `Ok(Some(Robot))` - The updated robot
    /// - `Ok(None)` - No robot with that ID
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn update(
        &self,
        params: UpdateRobotParams,
        now: DateTime<Utc>,
    ) -> Result<Option<Robot>, AppError> {
        let Some(existing) = entity::prelude::Robot::find_by_id(params.id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::robot::ActiveModel = existing.into();

        if let Some(slug) = params.slug {
            active.slug = ActiveValue::Set(slug);
        }
        if let Some(name) = params.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(manufacturer) = params.manufacturer {
            active.manufacturer_name = ActiveValue::Set(manufacturer.name);
            active.manufacturer_country = ActiveValue::Set(manufacturer.country);
            active.manufacturer_website = ActiveValue::Set(manufacturer.website);
        }
        if let Some(year) = params.year_introduced {
            active.year_introduced = ActiveValue::Set(Some(year));
        }
        if let Some(summary) = params.summary {
            active.summary = ActiveValue::Set(Some(summary));
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(specifications) = params.specifications {
            active.specifications = ActiveValue::Set(serde_json::to_value(&specifications)?);
        }
        if let Some(featured_image) = params.featured_image {
            active.featured_image = ActiveValue::Set(Some(serde_json::to_value(&featured_image)?));
        }
        if let Some(images) = params.images {
            active.images = ActiveValue::Set(serde_json::to_value(&images)?);
        }
        if let Some(videos) = params.videos {
            active.videos = ActiveValue::Set(serde_json::to_value(&videos)?);
        }
        if let Some(applications) = params.applications {
            active.applications = ActiveValue::Set(serde_json::to_value(&applications)?);
        }
        if let Some(reviews) = params.reviews {
            active.reviews = ActiveValue::Set(serde_json::to_value(&reviews)?);
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status.as_str().to_string());
        }
        if let Some(updated_by) = params.updated_by {
            active.updated_by = ActiveValue::Set(Some(updated_by));
        }
        active.updated_at = ActiveValue::Set(now);

        let entity = active.update(self.db).await?;

        let categories = match params.categories {
            Some(categories) => self.set_categories(entity.id, categories).await?,
            None => self
                .categories_for(&[entity.id])
                .await?
                .remove(&entity.id)
                .unwrap_or_default(),
        };

        Ok(Some(Robot::from_entity(entity, categories)?))
    }

    /// Deletes a robot and its category rows.
    ///
    /// # Returns
    /// - `Ok(true)` - Robot deleted
    /// - `Ok(false)` - No robot with that ID
    /// - `Err(AppError::DbErr)` - Database error during delete
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        entity::prelude::RobotCategory::delete_many()
            .filter(entity::robot_category::Column::RobotId.eq(id))
            .exec(self.db)
            .await?;

        let result = entity::prelude::Robot::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Counts robots per category over published robots.
    ///
    /// # Returns
    /// - `Ok(Vec<CategoryCount>)` - Counts sorted by count descending, then name
    /// - `Err(AppError::DbErr)` - Database error during query
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>, AppError> {
        let rows = entity::prelude::RobotCategory::find()
            .inner_join(entity::prelude::Robot)
            .filter(entity::robot::Column::Status.eq(RobotStatus::Published.as_str()))
            .all(self.db)
            .await?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for row in rows {
            *counts.entry(row.name).or_default() += 1;
        }

        let mut counts: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(name, count)| CategoryCount { name, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Ok(counts)
    }

    /// Gets the most viewed robots.
    ///
    /// # Arguments
    /// - `limit` - Maximum number of robots to return
    /// - `published_only` - Restrict to published robots
    pub async fn most_viewed(
        &self,
        limit: u64,
        published_only: bool,
    ) -> Result<Vec<Robot>, AppError> {
        let mut query = entity::prelude::Robot::find();
        if published_only {
            query = query.filter(entity::robot::Column::Status.eq(RobotStatus::Published.as_str()));
        }

        let entities = query
            .order_by_desc(entity::robot::Column::Views)
            .order_by_asc(entity::robot::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        self.hydrate(entities).await
    }

    /// Gets the most recently created robots of any status.
    pub async fn recently_added(&self, limit: u64) -> Result<Vec<Robot>, AppError> {
        let entities = entity::prelude::Robot::find()
            .order_by_desc(entity::robot::Column::CreatedAt)
            .order_by_desc(entity::robot::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        self.hydrate(entities).await
    }

    /// Gets published robots sharing at least one category with `robot`.
    ///
    /// # Arguments
    /// - `robot` - Robot to find relatives for, excluded from the result
    /// - `limit` - Maximum number of robots to return
    ///
    /// # Returns
    /// - `Ok(Vec<Robot>)` - Related robots, most viewed first (empty if `robot` has no categories)
    /// - `Err(AppError)` - Database error or malformed stored document
    pub async fn related(&self, robot: &Robot, limit: u64) -> Result<Vec<Robot>, AppError> {
        if robot.categories.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = self
            .robot_ids_in_categories(&robot.categories)
            .await?
            .into_iter()
            .filter(|id| *id != robot.id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Robot::find()
            .filter(entity::robot::Column::Id.is_in(ids))
            .filter(entity::robot::Column::Status.eq(RobotStatus::Published.as_str()))
            .order_by_desc(entity::robot::Column::Views)
            .order_by_asc(entity::robot::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        self.hydrate(entities).await
    }

    /// Counts robots, optionally restricted to one status.
    pub async fn count(&self, status: Option<RobotStatus>) -> Result<u64, AppError> {
        let mut query = entity::prelude::Robot::find();
        if let Some(status) = status {
            query = query.filter(entity::robot::Column::Status.eq(status.as_str()));
        }

        Ok(query.count(self.db).await?)
    }

    /// Sums the view counters of every robot.
    pub async fn total_views(&self) -> Result<i64, AppError> {
        let views: Vec<i64> = entity::prelude::Robot::find()
            .select_only()
            .column(entity::robot::Column::Views)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(views.into_iter().sum())
    }

    /// Increments a robot's view counter by one.
    ///
    /// Read-modify-write without locking: concurrent increments may be lost.
    ///
    /// # Returns
    /// - `Ok(true)` - Counter incremented
    /// - `Ok(false)` - No robot with that ID
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn increment_views(&self, id: i32) -> Result<bool, AppError> {
        let Some(existing) = entity::prelude::Robot::find_by_id(id).one(self.db).await? else {
            return Ok(false);
        };

        let views = existing.views + 1;
        let mut active: entity::robot::ActiveModel = existing.into();
        active.views = ActiveValue::Set(views);
        active.update(self.db).await?;

        Ok(true)
    }

    /// Adds `delta` to a robot's favorites counter, never going below zero.
    ///
    /// Read-modify-write without locking, like [`Self::increment_views`].
    pub async fn adjust_favorites(&self, id: i32, delta: i64) -> Result<bool, AppError> {
        let Some(existing) = entity::prelude::Robot::find_by_id(id).one(self.db).await? else {
            return Ok(false);
        };

        let favorites = (existing.favorites + delta).max(0);
        let mut active: entity::robot::ActiveModel = existing.into();
        active.favorites = ActiveValue::Set(favorites);
        active.update(self.db).await?;

        Ok(true)
    }

    /// Gets robots by ID, preserving the order of `ids` and skipping unknown IDs.
    pub async fn find_many(&self, ids: &[i32]) -> Result<Vec<Robot>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let entities = entity::prelude::Robot::find()
            .filter(entity::robot::Column::Id.is_in(ids.to_vec()))
            .all(self.db)
            .await?;
        let mut by_id: HashMap<i32, Robot> = self
            .hydrate(entities)
            .await?
            .into_iter()
            .map(|robot| (robot.id, robot))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Replaces the category set of a robot.
    ///
    /// Blank names are dropped and duplicates collapsed.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - Stored category names, sorted
    /// - `Err(AppError::DbErr)` - Database error
    async fn set_categories(
        &self,
        robot_id: i32,
        categories: Vec<String>,
    ) -> Result<Vec<String>, AppError> {
        entity::prelude::RobotCategory::delete_many()
            .filter(entity::robot_category::Column::RobotId.eq(robot_id))
            .exec(self.db)
            .await?;

        let mut names: Vec<String> = categories
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        names.dedup();

        if !names.is_empty() {
            entity::prelude::RobotCategory::insert_many(names.iter().map(|name| {
                entity::robot_category::ActiveModel {
                    robot_id: ActiveValue::Set(robot_id),
                    name: ActiveValue::Set(name.clone()),
                }
            }))
            .exec(self.db)
            .await?;
        }

        Ok(names)
    }

    /// Loads category names for a batch of robots, keyed by robot ID.
    async fn categories_for(&self, ids: &[i32]) -> Result<HashMap<i32, Vec<String>>, AppError> {
        let rows = entity::prelude::RobotCategory::find()
            .filter(entity::robot_category::Column::RobotId.is_in(ids.to_vec()))
            .order_by_asc(entity::robot_category::Column::Name)
            .all(self.db)
            .await?;

        let mut map: HashMap<i32, Vec<String>> = HashMap::new();
        for row in rows {
            map.entry(row.robot_id).or_default().push(row.name);
        }

        Ok(map)
    }

    /// IDs of robots carrying any of the given categories.
    async fn robot_ids_in_categories(&self, categories: &[String]) -> Result<Vec<i32>, AppError> {
        let mut ids: Vec<i32> = entity::prelude::RobotCategory::find()
            .select_only()
            .column(entity::robot_category::Column::RobotId)
            .filter(entity::robot_category::Column::Name.is_in(categories.to_vec()))
            .into_tuple()
            .all(self.db)
            .await?;
        ids.sort_unstable();
        ids.dedup();

        Ok(ids)
    }

    /// Converts robot rows to domain models with one category query for the batch.
    async fn hydrate(&self, entities: Vec<entity::robot::Model>) -> Result<Vec<Robot>, AppError> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = entities.iter().map(|e| e.id).collect();
        let mut categories = self.categories_for(&ids).await?;

        entities
            .into_iter()
            .map(|entity| {
                let names = categories.remove(&entity.id).unwrap_or_default();
                Robot::from_entity(entity, names)
            })
            .collect()
    }
}
