//! Robot factory for creating test catalog entries with their categories.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Factory for creating test robots.
///
/// The slug defaults to one derived from the generated name; set it explicitly
/// when a test depends on a specific slug.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::robot::RobotFactory;
///
/// let robot = RobotFactory::new(&db)
///     .name("Spot")
///     .slug("spot")
///     .published()
///     .categories(&["Quadruped"])
///     .views(42)
///     .build()
///     .await?;
/// ```
pub struct RobotFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    slug: String,
    manufacturer_name: String,
    summary: Option<String>,
    status: String,
    categories: Vec<String>,
    views: i64,
    favorites: i64,
    featured_image: Option<serde_json::Value>,
    images: serde_json::Value,
    videos: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl<'a> RobotFactory<'a> {
    /// Creates a new RobotFactory with default values.
    ///
    /// Defaults:
    /// - name / slug: `"Robot {id}"` / `"robot-{id}"`
    /// - manufacturer: `"Acme Robotics"`
    /// - status: `"draft"`, no categories, zero counters, no media
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            name: format!("Robot {}", id),
            slug: format!("robot-{}", id),
            manufacturer_name: "Acme Robotics".to_string(),
            summary: None,
            status: "draft".to_string(),
            categories: Vec::new(),
            views: 0,
            favorites: 0,
            featured_image: None,
            images: serde_json::json!([]),
            videos: serde_json::json!([]),
            created_at: Utc::now(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn manufacturer(mut self, manufacturer_name: impl Into<String>) -> Self {
        self.manufacturer_name = manufacturer_name.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the status: `"draft"`, `"published"` or `"archived"`.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Shorthand for `status("published")`.
    pub fn published(self) -> Self {
        self.status("published")
    }

    pub fn categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn views(mut self, views: i64) -> Self {
        self.views = views;
        self
    }

    pub fn favorites(mut self, favorites: i64) -> Self {
        self.favorites = favorites;
        self
    }

    /// Sets the featured image URL.
    pub fn featured_image(mut self, url: impl Into<String>) -> Self {
        self.featured_image = Some(serde_json::json!({
            "url": url.into(),
            "alt": "",
            "caption": ""
        }));
        self
    }

    /// Sets gallery image URLs.
    pub fn images(mut self, urls: &[&str]) -> Self {
        self.images = serde_json::Value::Array(
            urls.iter()
                .map(|url| serde_json::json!({"url": url, "alt": "", "caption": ""}))
                .collect(),
        );
        self
    }

    /// Sets the raw videos document.
    pub fn videos(mut self, videos: serde_json::Value) -> Self {
        self.videos = videos;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds and inserts the robot row and its category rows.
    ///
    /// # Returns
    /// - `Ok(entity::robot::Model)` - Created robot entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::robot::Model, DbErr> {
        let robot = entity::robot::ActiveModel {
            slug: ActiveValue::Set(self.slug),
            name: ActiveValue::Set(self.name),
            manufacturer_name: ActiveValue::Set(self.manufacturer_name),
            manufacturer_country: ActiveValue::Set(None),
            manufacturer_website: ActiveValue::Set(None),
            year_introduced: ActiveValue::Set(None),
            summary: ActiveValue::Set(self.summary),
            description: ActiveValue::Set(None),
            specifications: ActiveValue::Set(serde_json::json!({})),
            featured_image: ActiveValue::Set(self.featured_image),
            images: ActiveValue::Set(self.images),
            videos: ActiveValue::Set(self.videos),
            applications: ActiveValue::Set(serde_json::json!([])),
            reviews: ActiveValue::Set(serde_json::json!([])),
            status: ActiveValue::Set(self.status),
            views: ActiveValue::Set(self.views),
            favorites: ActiveValue::Set(self.favorites),
            created_by: ActiveValue::Set(None),
            updated_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(self.created_at),
            updated_at: ActiveValue::Set(self.created_at),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        if !self.categories.is_empty() {
            entity::prelude::RobotCategory::insert_many(self.categories.into_iter().map(|name| {
                entity::robot_category::ActiveModel {
                    robot_id: ActiveValue::Set(robot.id),
                    name: ActiveValue::Set(name),
                }
            }))
            .exec(self.db)
            .await?;
        }

        Ok(robot)
    }
}

/// Creates a draft robot with default values.
pub async fn create_robot(db: &DatabaseConnection) -> Result<entity::robot::Model, DbErr> {
    RobotFactory::new(db).build().await
}

/// Creates a published robot in the given categories.
pub async fn create_published_robot(
    db: &DatabaseConnection,
    categories: &[&str],
) -> Result<entity::robot::Model, DbErr> {
    RobotFactory::new(db)
        .published()
        .categories(categories)
        .build()
        .await
}
