//! Robot domain models and parameters.
//!
//! Provides the catalog entry domain model with its structured specification and
//! media documents decoded from their JSON columns, plus the parameter types used by
//! create, update and list operations.

use chrono::{DateTime, Utc};

use crate::{
    model::robot::{
        ApplicationDto, CategoryCountDto, ImageDto, ManufacturerDto, PaginatedRobotsDto, ReviewDto,
        RobotCountersDto, RobotDto, RobotReportDto, RobotStatus, SpecificationsDto, VideoDto,
        VideoKind,
    },
    server::error::AppError,
};

/// Catalog entry with decoded specification and media documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub manufacturer: ManufacturerDto,
    pub year_introduced: Option<i32>,
    /// Category names, sorted.
    pub categories: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: SpecificationsDto,
    pub featured_image: Option<ImageDto>,
    pub images: Vec<ImageDto>,
    pub videos: Vec<VideoDto>,
    pub applications: Vec<ApplicationDto>,
    pub reviews: Vec<ReviewDto>,
    pub status: RobotStatus,
    pub views: i64,
    pub favorites: i64,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Robot {
    /// Converts an entity model and its category rows to a robot domain model.
    ///
    /// # Arguments
    /// - `entity` - The robot row
    /// - `categories` - Category names belonging to the robot
    ///
    /// # Returns
    /// - `Ok(Robot)` - The converted domain model
    /// - `Err(AppError::JsonErr)` - A stored JSON document no longer matches its schema
    /// - `Err(AppError::InternalError)` - Stored status is not a known value
    pub fn from_entity(
        entity: entity::robot::Model,
        categories: Vec<String>,
    ) -> Result<Self, AppError> {
        let status = entity.status.parse::<RobotStatus>().map_err(|e| {
            AppError::InternalError(format!("Robot {} has invalid status: {}", entity.id, e))
        })?;

        Ok(Self {
            id: entity.id,
            slug: entity.slug,
            name: entity.name,
            manufacturer: ManufacturerDto {
                name: entity.manufacturer_name,
                country: entity.manufacturer_country,
                website: entity.manufacturer_website,
            },
            year_introduced: entity.year_introduced,
            categories,
            summary: entity.summary,
            description: entity.description,
            specifications: serde_json::from_value(entity.specifications)?,
            featured_image: entity
                .featured_image
                .map(serde_json::from_value)
                .transpose()?
                .flatten(),
            images: serde_json::from_value(entity.images)?,
            videos: serde_json::from_value(entity.videos)?,
            applications: serde_json::from_value(entity.applications)?,
            reviews: serde_json::from_value(entity.reviews)?,
            status,
            views: entity.views,
            favorites: entity.favorites,
            created_by: entity.created_by,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    /// Converts the robot domain model to a DTO for API responses.
    pub fn into_dto(self) -> RobotDto {
        RobotDto {
            id: self.id,
            slug: self.slug,
            name: self.name,
            manufacturer: self.manufacturer,
            year_introduced: self.year_introduced,
            categories: self.categories,
            summary: self.summary,
            description: self.description,
            specifications: self.specifications,
            featured_image: self.featured_image,
            images: self.images,
            videos: self.videos,
            applications: self.applications,
            reviews: self.reviews,
            status: self.status,
            stats: RobotCountersDto {
                views: self.views,
                favorites: self.favorites,
            },
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// URLs of every media object a hard delete should remove.
    ///
    /// Covers the featured image, gallery images, uploaded video files and all video
    /// thumbnails. Linked videos (YouTube, external) are not ours to delete.
    pub fn media_urls(&self) -> Vec<String> {
        let mut urls = Vec::new();

        if let Some(image) = &self.featured_image {
            urls.push(image.url.clone());
        }
        urls.extend(self.images.iter().map(|i| i.url.clone()));
        for video in &self.videos {
            if video.kind == VideoKind::File {
                urls.push(video.url.clone());
            }
            if let Some(thumbnail) = &video.thumbnail {
                urls.push(thumbnail.clone());
            }
        }

        urls
    }

    pub fn is_published(&self) -> bool {
        self.status == RobotStatus::Published
    }
}

/// Parameters for inserting a new robot.
#[derive(Debug, Clone)]
pub struct CreateRobotParams {
    pub slug: String,
    pub name: String,
    pub manufacturer: ManufacturerDto,
    pub year_introduced: Option<i32>,
    pub categories: Vec<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: SpecificationsDto,
    pub featured_image: Option<ImageDto>,
    pub images: Vec<ImageDto>,
    pub videos: Vec<VideoDto>,
    pub applications: Vec<ApplicationDto>,
    pub reviews: Vec<ReviewDto>,
    pub status: RobotStatus,
    /// ID of the creating user, stamped as both creator and last editor.
    pub created_by: Option<i32>,
}

/// Parameters for a partial robot update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateRobotParams {
    pub id: i32,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub manufacturer: Option<ManufacturerDto>,
    pub year_introduced: Option<i32>,
    pub categories: Option<Vec<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<SpecificationsDto>,
    pub featured_image: Option<ImageDto>,
    pub images: Option<Vec<ImageDto>>,
    pub videos: Option<Vec<VideoDto>>,
    pub applications: Option<Vec<ApplicationDto>>,
    pub reviews: Option<Vec<ReviewDto>>,
    pub status: Option<RobotStatus>,
    pub updated_by: Option<i32>,
}

/// Filter for robot listings.
#[derive(Debug, Clone, Default)]
pub struct RobotFilter {
    /// Exact category name.
    pub category: Option<String>,
    /// Case-insensitive substring of the manufacturer name.
    pub manufacturer: Option<String>,
    /// Free text matched against name, summary, description and manufacturer name.
    pub search: Option<String>,
    /// Restrict to published robots.
    pub published_only: bool,
}

/// Page of robots with pagination metadata. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedRobots {
    pub robots: Vec<Robot>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl PaginatedRobots {
    pub fn into_dto(self) -> PaginatedRobotsDto {
        PaginatedRobotsDto {
            robots: self.robots.into_iter().map(Robot::into_dto).collect(),
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}

/// Number of robots carrying a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn into_dto(self) -> CategoryCountDto {
        CategoryCountDto {
            name: self.name,
            count: self.count,
        }
    }
}

/// Catalog statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotReport {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub archived: u64,
    pub total_views: i64,
    pub categories: Vec<CategoryCount>,
    pub most_viewed: Vec<Robot>,
    pub recently_added: Vec<Robot>,
}

impl RobotReport {
    pub fn into_dto(self) -> RobotReportDto {
        RobotReportDto {
            total: self.total,
            published: self.published,
            draft: self.draft,
            archived: self.archived,
            total_views: self.total_views,
            categories: self
                .categories
                .into_iter()
                .map(CategoryCount::into_dto)
                .collect(),
            most_viewed: self.most_viewed.into_iter().map(Robot::into_dto).collect(),
            recently_added: self
                .recently_added
                .into_iter()
                .map(Robot::into_dto)
                .collect(),
        }
    }
}
