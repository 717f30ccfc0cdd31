//! Robot catalog business logic.
//!
//! Handles slug generation, visibility of unpublished robots, uploaded media, and
//! the aggregate endpoints behind the public site and the admin dashboard.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::FieldErrorDto,
        robot::{ImageDto, ReviewDto, RobotStatus, VideoDto, VideoKind},
    },
    server::{
        data::robot::RobotRepository,
        error::{storage::StorageError, AppError},
        model::robot::{
            CategoryCount, CreateRobotParams, PaginatedRobots, Robot, RobotFilter, RobotReport,
            UpdateRobotParams,
        },
        storage::MediaStorage,
        util::{
            form::{RobotForm, UploadedFile},
            slug::{looks_like_id, slugify},
        },
    },
};

const IMAGE_FOLDER: &str = "robots/images";
const VIDEO_FOLDER: &str = "robots/videos";

/// Number of related robots returned for a robot page.
pub const RELATED_LIMIT: u64 = 3;
/// Default and maximum size of the popular robots list.
pub const POPULAR_DEFAULT: u64 = 5;
pub const POPULAR_MAX: u64 = 50;
/// Size of the most viewed and recently added lists in the dashboard report.
pub const REPORT_LIST_SIZE: u64 = 5;

pub struct RobotService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a dyn MediaStorage,
}

impl<'a> RobotService<'a> {
    pub fn new(db: &'a DatabaseConnection, storage: &'a dyn MediaStorage) -> Self {
        Self { db, storage }
    }

    /// Gets a page of robots matching the filter
    pub async fn list(
        &self,
        filter: &RobotFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedRobots, AppError> {
        RobotRepository::new(self.db)
            .list(filter, page, per_page)
            .await
    }

    /// Resolves a robot by numeric ID or slug.
    ///
    /// All-digit values are tried as an ID first and fall back to a slug lookup, so a
    /// robot named "2001" stays reachable by its slug.
    pub async fn find(&self, id_or_slug: &str) -> Result<Option<Robot>, AppError> {
        let repo = RobotRepository::new(self.db);

        if looks_like_id(id_or_slug) {
            if let Ok(id) = id_or_slug.parse::<i32>() {
                if let Some(robot) = repo.find_by_id(id).await? {
                    return Ok(Some(robot));
                }
            }
        }

        repo.find_by_slug(id_or_slug).await
    }

    /// Gets a robot for display.
    ///
    /// # Arguments
    /// - `id_or_slug` - Numeric ID or slug
    /// - `admin_view` - Include drafts and archived robots
    ///
    /// # Returns
    /// - `Ok(Robot)` - The robot
    /// - `Err(AppError::NotFound)` - Unknown, or not published and not an admin view
    pub async fn get(&self, id_or_slug: &str, admin_view: bool) -> Result<Robot, AppError> {
        match self.find(id_or_slug).await? {
            Some(robot) if admin_view || robot.is_published() => Ok(robot),
            _ => Err(AppError::NotFound("Robot not found".to_string())),
        }
    }

    /// Increments a robot's view counter in a detached task.
    ///
    /// The caller's response never waits for or fails on the increment.
    pub fn spawn_view_increment(db: DatabaseConnection, robot_id: i32) {
        tokio::spawn(async move {
            if let Err(e) = RobotRepository::new(&db).increment_views(robot_id).await {
                tracing::warn!("Failed to increment views for robot {}: {}", robot_id, e);
            }
        });
    }

    /// Creates a robot from a submitted form.
    ///
    /// Uploaded files are stored before the row is written; if the insert fails they
    /// are removed again.
    ///
    /// # Returns
    /// - `Ok(Robot)` - The created robot
    /// - `Err(AppError::Validation)` - Missing name or manufacturer, bad ratings or file types
    /// - `Err(AppError::BadRequest)` - A robot with the same slug exists
    pub async fn create(&self, form: RobotForm, user_id: i32) -> Result<Robot, AppError> {
        let mut errors = Vec::new();

        let name = form.input.name.clone().filter(|n| !n.trim().is_empty());
        if name.is_none() {
            errors.push(FieldErrorDto::new("name", "Name is required"));
        }
        let manufacturer = form
            .input
            .manufacturer
            .clone()
            .filter(|m| !m.name.trim().is_empty());
        if manufacturer.is_none() {
            errors.push(FieldErrorDto::new(
                "manufacturer",
                "Manufacturer is required",
            ));
        }
        validate_reviews(form.input.reviews.as_deref(), &mut errors);
        validate_uploads(&form, &mut errors);

        let (Some(name), Some(manufacturer)) = (name, manufacturer) else {
            return Err(AppError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(AppError::field(
                "name",
                "Name must contain at least one letter or digit",
            ));
        }

        let repo = RobotRepository::new(self.db);
        if repo.slug_exists(&slug, None).await? {
            return Err(AppError::BadRequest(
                "A robot with this name already exists".to_string(),
            ));
        }

        let uploads = self.store_uploads(&form, &name).await?;

        let featured_image = uploads
            .featured_image
            .clone()
            .or(form.input.featured_image)
            .map(|image| {
                label_featured(
                    image,
                    &form.featured_image_alt,
                    &form.featured_image_caption,
                )
            });

        let mut images = form.input.images.unwrap_or_default();
        images.extend(uploads.images.iter().cloned());

        let mut videos = form.input.video_links.unwrap_or_default();
        videos.extend(uploads.videos.iter().cloned());

        let params = CreateRobotParams {
            slug,
            name,
            manufacturer,
            year_introduced: form.input.year_introduced,
            categories: form.input.categories.unwrap_or_default(),
            summary: form.input.summary,
            description: form.input.description,
            specifications: form.input.specifications.unwrap_or_default(),
            featured_image,
            images,
            videos,
            applications: form.input.applications.unwrap_or_default(),
            reviews: form.input.reviews.unwrap_or_default(),
            status: form.input.status.unwrap_or_default(),
            created_by: Some(user_id),
        };

        match repo.create(params, Utc::now()).await {
            Ok(robot) => {
                tracing::info!(
                    "User {} created robot {} ({})",
                    user_id,
                    robot.id,
                    robot.slug
                );
                Ok(robot)
            }
            Err(e) => {
                self.delete_media(&uploads.urls()).await;
                Err(e)
            }
        }
    }

    /// Merges a submitted form into an existing robot.
    ///
    /// Only fields present in the form change. A renamed robot gets a new slug when
    /// that slug is free; otherwise it keeps the old one. Uploaded gallery images are
    /// appended unless `replace_images` is set, in which case they replace the gallery
    /// and the files of dropped gallery images are removed.
    ///
    /// # Returns
    /// - `Ok(Robot)` - The updated robot
    /// - `Err(AppError::NotFound)` - Unknown robot
    /// - `Err(AppError::Validation)` - Blank name, bad ratings or file types
    pub async fn update(
        &self,
        id: i32,
        form: RobotForm,
        replace_images: bool,
        user_id: i32,
    ) -> Result<Robot, AppError> {
        let repo = RobotRepository::new(self.db);

        let Some(existing) = repo.find_by_id(id).await? else {
            return Err(AppError::NotFound("Robot not found".to_string()));
        };

        let mut errors = Vec::new();
        if form
            .input
            .name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
        {
            errors.push(FieldErrorDto::new("name", "Name cannot be empty"));
        }
        validate_reviews(form.input.reviews.as_deref(), &mut errors);
        validate_uploads(&form, &mut errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mut slug = None;
        if let Some(name) = form.input.name.as_deref().filter(|n| *n != existing.name) {
            let candidate = slugify(name);
            if !candidate.is_empty()
                && candidate != existing.slug
                && !repo.slug_exists(&candidate, Some(id)).await?
            {
                slug = Some(candidate);
            }
        }

        let manufacturer = form.input.manufacturer.clone().map(|mut m| {
            if m.name.trim().is_empty() {
                m.name = existing.manufacturer.name.clone();
            }
            m.country = m.country.or_else(|| existing.manufacturer.country.clone());
            m.website = m.website.or_else(|| existing.manufacturer.website.clone());
            m
        });

        let display_name = form
            .input
            .name
            .clone()
            .unwrap_or_else(|| existing.name.clone());
        let uploads = self.store_uploads(&form, &display_name).await?;

        let featured_image = match uploads
            .featured_image
            .clone()
            .or(form.input.featured_image.clone())
        {
            Some(image) => Some(label_featured(
                image,
                &form.featured_image_alt,
                &form.featured_image_caption,
            )),
            None if form.featured_image_alt.is_some() || form.featured_image_caption.is_some() => {
                existing.featured_image.clone().map(|image| {
                    label_featured(
                        image,
                        &form.featured_image_alt,
                        &form.featured_image_caption,
                    )
                })
            }
            None => None,
        };

        let images = if replace_images {
            let mut images = form.input.images.clone().unwrap_or_default();
            images.extend(uploads.images.iter().cloned());
            Some(images)
        } else if form.input.images.is_some() || !uploads.images.is_empty() {
            let mut images = form
                .input
                .images
                .clone()
                .unwrap_or_else(|| existing.images.clone());
            images.extend(uploads.images.iter().cloned());
            Some(images)
        } else {
            None
        };

        let videos = if form.input.video_links.is_some() || !uploads.videos.is_empty() {
            let mut videos = form
                .input
                .video_links
                .clone()
                .unwrap_or_else(|| existing.videos.clone());
            videos.extend(uploads.videos.iter().cloned());
            Some(videos)
        } else {
            None
        };

        let dropped_images: Vec<String> = match &images {
            Some(images) if replace_images => existing
                .images
                .iter()
                .filter(|old| !images.iter().any(|new| new.url == old.url))
                .map(|old| old.url.clone())
                .collect(),
            _ => Vec::new(),
        };

        let params = UpdateRobotParams {
            id,
            slug,
            name: form.input.name,
            manufacturer,
            year_introduced: form.input.year_introduced,
            categories: form.input.categories,
            summary: form.input.summary,
            description: form.input.description,
            specifications: form.input.specifications,
            featured_image,
            images,
            videos,
            applications: form.input.applications,
            reviews: form.input.reviews,
            status: form.input.status,
            updated_by: Some(user_id),
        };

        let robot = match repo.update(params, Utc::now()).await {
            Ok(Some(robot)) => robot,
            Ok(None) => {
                self.delete_media(&uploads.urls()).await;
                return Err(AppError::NotFound("Robot not found".to_string()));
            }
            Err(e) => {
                self.delete_media(&uploads.urls()).await;
                return Err(e);
            }
        };

        self.delete_media(&dropped_images).await;

        tracing::info!(
            "User {} updated robot {} ({})",
            user_id,
            robot.id,
            robot.slug
        );

        Ok(robot)
    }

    /// Deletes or archives a robot.
    ///
    /// # Arguments
    /// - `id` - Robot ID
    /// - `soft` - Archive instead of deleting
    /// - `user_id` - Caller, stamped as last editor when archiving
    ///
    /// # Returns
    /// - `Ok(Some(Robot))` - Archived robot (soft mode)
    /// - `Ok(None)` - Robot and its media deleted (hard mode)
    /// - `Err(AppError::NotFound)` - Unknown robot
    pub async fn delete(
        &self,
        id: i32,
        soft: bool,
        user_id: i32,
    ) -> Result<Option<Robot>, AppError> {
        let repo = RobotRepository::new(self.db);

        let Some(existing) = repo.find_by_id(id).await? else {
            return Err(AppError::NotFound("Robot not found".to_string()));
        };

        if soft {
            let archived = repo
                .update(
                    UpdateRobotParams {
                        id,
                        status: Some(RobotStatus::Archived),
                        updated_by: Some(user_id),
                        ..Default::default()
                    },
                    Utc::now(),
                )
                .await?
                .ok_or_else(|| AppError::NotFound("Robot not found".to_string()))?;

            tracing::info!("User {} archived robot {}", user_id, id);

            return Ok(Some(archived));
        }

        self.delete_media(&existing.media_urls()).await;
        repo.delete(id).await?;

        tracing::info!("User {} deleted robot {} ({})", user_id, id, existing.slug);

        Ok(None)
    }

    /// Gets the published category histogram
    pub async fn categories(&self) -> Result<Vec<CategoryCount>, AppError> {
        RobotRepository::new(self.db).category_counts().await
    }

    /// Gets the most viewed published robots
    pub async fn popular(&self, limit: Option<u64>) -> Result<Vec<Robot>, AppError> {
        let limit = limit.unwrap_or(POPULAR_DEFAULT).clamp(1, POPULAR_MAX);
        RobotRepository::new(self.db).most_viewed(limit, true).await
    }

    /// Gets up to three published robots sharing a category with the given robot.
    ///
    /// The robot itself is resolved with the same visibility rule as [`Self::get`], so
    /// an unpublished robot is 404 outside the admin view.
    pub async fn related(
        &self,
        id_or_slug: &str,
        admin_view: bool,
    ) -> Result<Vec<Robot>, AppError> {
        let robot = self.get(id_or_slug, admin_view).await?;

        RobotRepository::new(self.db)
            .related(&robot, RELATED_LIMIT)
            .await
    }

    /// Builds the dashboard report
    pub async fn stats(&self) -> Result<RobotReport, AppError> {
        let repo = RobotRepository::new(self.db);

        Ok(RobotReport {
            total: repo.count(None).await?,
            published: repo.count(Some(RobotStatus::Published)).await?,
            draft: repo.count(Some(RobotStatus::Draft)).await?,
            archived: repo.count(Some(RobotStatus::Archived)).await?,
            total_views: repo.total_views().await?,
            categories: repo.category_counts().await?,
            most_viewed: repo.most_viewed(REPORT_LIST_SIZE, false).await?,
            recently_added: repo.recently_added(REPORT_LIST_SIZE).await?,
        })
    }

    /// Stores every uploaded file of a form.
    ///
    /// On a storage failure the files stored so far are removed and the error returned.
    async fn store_uploads(
        &self,
        form: &RobotForm,
        robot_name: &str,
    ) -> Result<StoredMedia, AppError> {
        let mut stored = StoredMedia::default();

        if let Err(e) = self.store_all(form, robot_name, &mut stored).await {
            self.delete_media(&stored.urls()).await;
            return Err(e.into());
        }

        Ok(stored)
    }

    async fn store_all(
        &self,
        form: &RobotForm,
        robot_name: &str,
        stored: &mut StoredMedia,
    ) -> Result<(), StorageError> {
        if let Some(file) = &form.featured_image_file {
            let url = self.put(IMAGE_FOLDER, file).await?;
            stored.featured_image = Some(ImageDto {
                url,
                alt: robot_name.to_string(),
                caption: String::new(),
            });
        }

        for file in &form.image_files {
            let url = self.put(IMAGE_FOLDER, file).await?;
            stored.images.push(ImageDto {
                url,
                alt: robot_name.to_string(),
                caption: String::new(),
            });
        }

        for file in &form.video_files {
            let url = self.put(VIDEO_FOLDER, file).await?;
            stored.videos.push(VideoDto {
                kind: VideoKind::File,
                url,
                title: file.file_name.clone(),
                description: String::new(),
                thumbnail: None,
            });
        }

        Ok(())
    }

    async fn put(&self, folder: &str, file: &UploadedFile) -> Result<String, StorageError> {
        self.storage
            .put(
                folder,
                &file.file_name,
                &file.content_type,
                file.bytes.clone(),
            )
            .await
    }

    /// Best-effort removal of media objects; failures are logged, never returned.
    async fn delete_media(&self, urls: &[String]) {
        for url in urls {
            match self.storage.delete(url).await {
                Ok(()) => {}
                Err(StorageError::ForeignUrl(url)) => {
                    tracing::debug!("Not deleting external media {}", url)
                }
                Err(e) => tracing::warn!("Failed to delete media {}: {}", url, e),
            }
        }
    }
}

/// Media stored for one form submission.
#[derive(Default)]
struct StoredMedia {
    featured_image: Option<ImageDto>,
    images: Vec<ImageDto>,
    videos: Vec<VideoDto>,
}

impl StoredMedia {
    fn urls(&self) -> Vec<String> {
        self.featured_image
            .iter()
            .chain(self.images.iter())
            .map(|i| i.url.clone())
            .chain(self.videos.iter().map(|v| v.url.clone()))
            .collect()
    }
}

fn label_featured(mut image: ImageDto, alt: &Option<String>, caption: &Option<String>) -> ImageDto {
    if let Some(alt) = alt {
        image.alt = alt.clone();
    }
    if let Some(caption) = caption {
        image.caption = caption.clone();
    }
    image
}

fn validate_reviews(reviews: Option<&[ReviewDto]>, errors: &mut Vec<FieldErrorDto>) {
    if reviews.is_some_and(|reviews| reviews.iter().any(|r| !(1..=5).contains(&r.rating))) {
        errors.push(FieldErrorDto::new(
            "reviews",
            "Review ratings must be between 1 and 5",
        ));
    }
}

fn validate_uploads(form: &RobotForm, errors: &mut Vec<FieldErrorDto>) {
    let bad_image = form
        .featured_image_file
        .iter()
        .chain(form.image_files.iter())
        .any(|f| !f.content_type.starts_with("image/"));
    if bad_image {
        errors.push(FieldErrorDto::new(
            "images",
            "Only image files can be uploaded as images",
        ));
    }

    if form
        .video_files
        .iter()
        .any(|f| !f.content_type.starts_with("video/"))
    {
        errors.push(FieldErrorDto::new(
            "videos",
            "Only video files can be uploaded as videos",
        ));
    }
}
