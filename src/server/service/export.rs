//! Catalog export, import and publishing to a GitHub repository.
//!
//! The export document is the portable form of the catalog. It can be downloaded,
//! imported back (robots are matched by slug) or committed to a repository through
//! the GitHub contents API. A commit rejected because the file moved on is reported
//! as a conflict; the caller decides whether to export again.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use reqwest::StatusCode;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
    model::robot::{GithubExportResultDto, ImportResultDto, RobotExportDto, RobotImportDto},
    server::{
        config::GithubConfig,
        data::robot::RobotRepository,
        error::AppError,
        model::robot::{CreateRobotParams, Robot, UpdateRobotParams},
        util::slug::slugify,
    },
};

/// Version written into export documents.
pub const EXPORT_VERSION: u32 = 1;

pub struct ExportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ExportService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds an export document holding every robot regardless of status.
    pub async fn export(&self) -> Result<RobotExportDto, AppError> {
        let robots = RobotRepository::new(self.db).all().await?;

        Ok(RobotExportDto {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            robots: robots.into_iter().map(Robot::into_dto).collect(),
        })
    }

    /// Imports robots, matching existing ones by slug.
    ///
    /// Entries without a slug use the slug derived from their name. Entries missing
    /// a name or manufacturer, or carrying a review rating outside 1 to 5, are
    /// skipped. Counters of existing robots are left alone.
    ///
    /// # Returns
    /// - `Ok(ImportResultDto)` - Number of created, updated and skipped entries
    pub async fn import(
        &self,
        doc: RobotImportDto,
        user_id: i32,
    ) -> Result<ImportResultDto, AppError> {
        let repo = RobotRepository::new(self.db);
        let mut result = ImportResultDto::default();

        for entry in doc.robots {
            let mut robot = entry.robot;

            let name = robot.name.take().filter(|n| !n.trim().is_empty());
            let manufacturer = robot
                .manufacturer
                .take()
                .filter(|m| !m.name.trim().is_empty());
            let valid_reviews = robot
                .reviews
                .as_ref()
                .is_none_or(|reviews| reviews.iter().all(|r| (1..=5).contains(&r.rating)));

            let (Some(name), Some(manufacturer), true) = (name, manufacturer, valid_reviews) else {
                result.skipped += 1;
                continue;
            };

            let slug = entry
                .slug
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| slugify(&name));
            if slug.is_empty() {
                result.skipped += 1;
                continue;
            }

            let videos = entry.videos.or(robot.video_links);
            let now = Utc::now();

            match repo.find_by_slug(&slug).await? {
                Some(existing) => {
                    repo.update(
                        UpdateRobotParams {
                            id: existing.id,
                            slug: None,
                            name: Some(name),
                            manufacturer: Some(manufacturer),
                            year_introduced: robot.year_introduced,
                            categories: robot.categories,
                            summary: robot.summary,
                            description: robot.description,
                            specifications: robot.specifications,
                            featured_image: robot.featured_image,
                            images: robot.images,
                            videos,
                            applications: robot.applications,
                            reviews: robot.reviews,
                            status: robot.status,
                            updated_by: Some(user_id),
                        },
                        now,
                    )
                    .await?;
                    result.updated += 1;
                }
                None => {
                    repo.create(
                        CreateRobotParams {
                            slug,
                            name,
                            manufacturer,
                            year_introduced: robot.year_introduced,
                            categories: robot.categories.unwrap_or_default(),
                            summary: robot.summary,
                            description: robot.description,
                            specifications: robot.specifications.unwrap_or_default(),
                            featured_image: robot.featured_image,
                            images: robot.images.unwrap_or_default(),
                            videos: videos.unwrap_or_default(),
                            applications: robot.applications.unwrap_or_default(),
                            reviews: robot.reviews.unwrap_or_default(),
                            status: robot.status.unwrap_or_default(),
                            created_by: Some(user_id),
                        },
                        now,
                    )
                    .await?;
                    result.created += 1;
                }
            }
        }

        tracing::info!(
            "User {} imported robots: {} created, {} updated, {} skipped",
            user_id,
            result.created,
            result.updated,
            result.skipped
        );

        Ok(result)
    }
}

/// Commits export documents through the GitHub contents API.
pub struct GithubPublisher<'a> {
    client: &'a reqwest::Client,
    config: &'a GithubConfig,
}

#[derive(Deserialize)]
struct ContentsFile {
    sha: String,
}

#[derive(Deserialize)]
struct ContentsCommit {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct ContentsWriteResponse {
    commit: Option<ContentsCommit>,
}

impl<'a> GithubPublisher<'a> {
    pub fn new(client: &'a reqwest::Client, config: &'a GithubConfig) -> Self {
        Self { client, config }
    }

    /// Writes the export document to the configured repository path.
    ///
    /// Reads the current blob SHA first so the write replaces that exact version.
    ///
    /// # Returns
    /// - `Ok(GithubExportResultDto)` - Path, commit SHA and robot count
    /// - `Err(AppError::Conflict)` - The file changed since it was read
    /// - `Err(AppError::InternalError)` - GitHub refused the request
    pub async fn publish(&self, doc: &RobotExportDto) -> Result<GithubExportResultDto, AppError> {
        let url = self.contents_url()?;

        let sha = self.current_sha(&url).await?;

        let body = serde_json::to_vec_pretty(doc)?;
        let message = format!("Update robot catalog ({} robots)", doc.robots.len());
        let payload = contents_payload(&body, &message, &self.config.branch, sha.as_deref());

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::USER_AGENT, "robopedia")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;

        check_write_status(response.status())?;

        let written: ContentsWriteResponse = response.json().await?;
        let commit_sha = written.commit.and_then(|c| c.sha);

        tracing::info!(
            "Published {} robots to {}/{}",
            doc.robots.len(),
            self.config.repo,
            self.config.data_path
        );

        Ok(GithubExportResultDto {
            path: self.config.data_path.clone(),
            commit_sha,
            robots: doc.robots.len(),
        })
    }

    async fn current_sha(&self, url: &Url) -> Result<Option<String>, AppError> {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("ref", &self.config.branch);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::USER_AGENT, "robopedia")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let file: ContentsFile = response.json().await?;
                Ok(Some(file.sha))
            }
            status => Err(AppError::InternalError(format!(
                "GitHub contents lookup for {} failed with status {}",
                self.config.data_path, status
            ))),
        }
    }

    fn contents_url(&self) -> Result<Url, AppError> {
        let raw = format!(
            "{}/repos/{}/contents/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.repo.trim_matches('/'),
            self.config.data_path.trim_start_matches('/')
        );

        Url::parse(&raw).map_err(|e| {
            AppError::InternalError(format!("Invalid GitHub contents URL {}: {}", raw, e))
        })
    }
}

/// Builds the body of a contents API write.
///
/// `sha` must be the blob being replaced; it is omitted when creating the file.
pub fn contents_payload(content: &[u8], message: &str, branch: &str, sha: Option<&str>) -> Value {
    let mut payload = json!({
        "message": message,
        "content": STANDARD.encode(content),
        "branch": branch,
    });

    if let Some(sha) = sha {
        payload["sha"] = Value::String(sha.to_string());
    }

    payload
}

/// Maps the status of a contents API write to an error.
///
/// GitHub answers 409 or 422 when the supplied SHA no longer matches the file.
pub fn check_write_status(status: StatusCode) -> Result<(), AppError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(AppError::Conflict(
            "The export file changed on GitHub, retry the export".to_string(),
        )),
        s => Err(AppError::InternalError(format!(
            "GitHub contents write failed with status {}",
            s
        ))),
    }
}
