use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Publication state of a robot. Any state may be set at any time.
///
/// Robots submitted without a status are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl RobotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Draft => "draft",
            RobotStatus::Published => "published",
            RobotStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(RobotStatus::Draft),
            "published" => Ok(RobotStatus::Published),
            "archived" => Ok(RobotStatus::Archived),
            other => Err(format!("Unknown robot status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ManufacturerDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A numeric value paired with its unit, e.g. `{ "value": 1.2, "unit": "m" }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct MeasurementDto {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct PhysicalSpecsDto {
    #[serde(default)]
    pub height: Option<MeasurementDto>,
    #[serde(default)]
    pub width: Option<MeasurementDto>,
    #[serde(default)]
    pub length: Option<MeasurementDto>,
    #[serde(default)]
    pub weight: Option<MeasurementDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct TemperatureRangeDto {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSpecsDto {
    #[serde(default)]
    pub battery_runtime: Option<MeasurementDto>,
    #[serde(default)]
    pub speed: Option<MeasurementDto>,
    #[serde(default)]
    pub payload: Option<MeasurementDto>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub degrees_of_freedom: Option<u32>,
    #[serde(default)]
    pub operating_temperature: Option<TemperatureRangeDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct SensorDto {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct CustomFieldDto {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationsDto {
    #[serde(default)]
    pub physical: PhysicalSpecsDto,
    #[serde(default)]
    pub performance: PerformanceSpecsDto,
    #[serde(default)]
    pub sensors: Vec<SensorDto>,
    #[serde(default)]
    pub connectivity: Vec<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomFieldDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ImageDto {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    #[default]
    File,
    Url,
    Youtube,
    External,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct VideoDto {
    #[serde(rename = "type", default)]
    pub kind: VideoKind,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ApplicationDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    #[serde(default)]
    pub user: Option<i32>,
    pub rating: i32,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct RobotCountersDto {
    pub views: i64,
    pub favorites: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotDto {
    pub id: i32,
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
    pub stats: RobotCountersDto,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaginatedRobotsDto {
    pub robots: Vec<RobotDto>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

/// Create/update body for robots.
///
/// The same fields are accepted as multipart text fields, where the structured
/// ones (`manufacturer`, `categories`, `specifications`, ...) arrive JSON-encoded.
/// In a JSON body `manufacturer` may be a plain name string and video links are
/// given as `videoLinks`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotInputDto {
    pub name: Option<String>,
    pub manufacturer: Option<ManufacturerDto>,
    pub year_introduced: Option<i32>,
    pub categories: Option<Vec<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<SpecificationsDto>,
    pub featured_image: Option<ImageDto>,
    pub images: Option<Vec<ImageDto>>,
    pub video_links: Option<Vec<VideoDto>>,
    pub applications: Option<Vec<ApplicationDto>>,
    pub reviews: Option<Vec<ReviewDto>>,
    pub status: Option<RobotStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryCountDto {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotReportDto {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub archived: u64,
    pub total_views: i64,
    pub categories: Vec<CategoryCountDto>,
    pub most_viewed: Vec<RobotDto>,
    pub recently_added: Vec<RobotDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotExportDto {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub robots: Vec<RobotDto>,
}

/// One robot in an import document.
///
/// Accepts the entries of an export document: `videos` is read as well as
/// `videoLinks`, and fields such as `id` or `stats` are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RobotImportEntryDto {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub robot: RobotInputDto,
    #[serde(default)]
    pub videos: Option<Vec<VideoDto>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct RobotImportDto {
    #[serde(default)]
    pub robots: Vec<RobotImportEntryDto>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ImportResultDto {
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GithubExportResultDto {
    pub path: String,
    pub commit_sha: Option<String>,
    pub robots: usize,
}

/// Accepts a number, a numeric string or nothing.
///
/// Admin forms post numeric inputs as strings; blank or malformed values become `None`
/// rather than failing the whole document.
fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse().ok()),
        Some(serde_json::Value::Null) | None => Ok(None),
        Some(value) => Ok(serde_json::from_value(value).ok()),
    }
}
