//! Robot create/update form binding.
//!
//! A single declarative field table drives both multipart and JSON bodies: every
//! incoming field name is looked up in [`RobotField`] and applied to a [`RobotForm`]
//! with the same lenient parsing rules, whatever the transport.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde_json::{Map, Value};

use crate::{
    model::robot::{
        ApplicationDto, ImageDto, ManufacturerDto, ReviewDto, RobotInputDto, RobotStatus,
        SpecificationsDto, VideoDto,
    },
    server::{
        error::AppError,
        util::parse::{
            parse_categories, parse_json_or_default, parse_json_strict, parse_manufacturer,
            parse_text,
        },
    },
};

/// A file part received with a robot form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Fields understood by the robot form, keyed by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotField {
    Name,
    Manufacturer,
    ManufacturerName,
    ManufacturerCountry,
    ManufacturerWebsite,
    YearIntroduced,
    Categories,
    Summary,
    Description,
    Specifications,
    FeaturedImage,
    FeaturedImageAlt,
    FeaturedImageCaption,
    Images,
    VideoLinks,
    Applications,
    Reviews,
    Status,
}

impl RobotField {
    const ALL: &'static [(&'static str, RobotField)] = &[
        ("name", RobotField::Name),
        ("manufacturer", RobotField::Manufacturer),
        ("manufacturerName", RobotField::ManufacturerName),
        ("manufacturerCountry", RobotField::ManufacturerCountry),
        ("manufacturerWebsite", RobotField::ManufacturerWebsite),
        ("yearIntroduced", RobotField::YearIntroduced),
        ("categories", RobotField::Categories),
        ("summary", RobotField::Summary),
        ("description", RobotField::Description),
        ("specifications", RobotField::Specifications),
        ("featuredImage", RobotField::FeaturedImage),
        ("featuredImageAlt", RobotField::FeaturedImageAlt),
        ("featuredImageCaption", RobotField::FeaturedImageCaption),
        ("images", RobotField::Images),
        ("videoLinks", RobotField::VideoLinks),
        ("applications", RobotField::Applications),
        ("reviews", RobotField::Reviews),
        ("status", RobotField::Status),
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, field)| *field)
    }
}

/// Parsed robot form: the field values plus any uploaded files.
#[derive(Debug, Clone, Default)]
pub struct RobotForm {
    pub input: RobotInputDto,
    pub featured_image_alt: Option<String>,
    pub featured_image_caption: Option<String>,
    pub featured_image_file: Option<UploadedFile>,
    pub image_files: Vec<UploadedFile>,
    pub video_files: Vec<UploadedFile>,
}

impl RobotForm {
    /// Applies one field value to the form.
    ///
    /// # Returns
    /// - `Ok(())` - Value applied (malformed JSON documents degrade to defaults)
    /// - `Err(AppError::Validation)` - `status` or `yearIntroduced` is not understood
    pub fn apply(&mut self, field: RobotField, value: Value) -> Result<(), AppError> {
        let input = &mut self.input;

        match field {
            RobotField::Name => input.name = parse_text(&value),
            RobotField::Manufacturer => {
                input.manufacturer = parse_manufacturer(&value);
            }
            RobotField::ManufacturerName => {
                let name = parse_text(&value).unwrap_or_default();
                manufacturer_mut(input).name = name;
            }
            RobotField::ManufacturerCountry => {
                manufacturer_mut(input).country = parse_text(&value).filter(|s| !s.is_empty());
            }
            RobotField::ManufacturerWebsite => {
                manufacturer_mut(input).website = parse_text(&value).filter(|s| !s.is_empty());
            }
            RobotField::YearIntroduced => {
                input.year_introduced = match parse_text(&value).as_deref() {
                    None | Some("") => None,
                    Some(year) => Some(year.parse::<i32>().map_err(|_| {
                        AppError::field("yearIntroduced", "Year introduced must be a number")
                    })?),
                };
            }
            RobotField::Categories => {
                // Repeated `categories[]` parts accumulate
                let parsed = parse_categories(&value);
                match input.categories.as_mut() {
                    Some(categories) => {
                        for category in parsed {
                            if !categories.contains(&category) {
                                categories.push(category);
                            }
                        }
                    }
                    None => input.categories = Some(parsed),
                }
            }
            RobotField::Summary => input.summary = parse_text(&value),
            RobotField::Description => input.description = parse_text(&value),
            RobotField::Specifications => {
                input.specifications = Some(parse_json_or_default::<SpecificationsDto>(
                    "specifications",
                    &value,
                ));
            }
            RobotField::FeaturedImage => {
                input.featured_image = match &value {
                    Value::String(s) if !s.trim_start().starts_with('{') => {
                        Some(s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .map(|url| ImageDto {
                                url,
                                ..Default::default()
                            })
                    }
                    _ => parse_json_or_default::<Option<ImageDto>>("featuredImage", &value),
                };
            }
            RobotField::FeaturedImageAlt => self.featured_image_alt = parse_text(&value),
            RobotField::FeaturedImageCaption => self.featured_image_caption = parse_text(&value),
            RobotField::Images => {
                input.images = Some(parse_json_or_default::<Vec<ImageDto>>("images", &value));
            }
            RobotField::VideoLinks => {
                input.video_links =
                    Some(parse_json_or_default::<Vec<VideoDto>>("videoLinks", &value));
            }
            RobotField::Applications => {
                input.applications = Some(parse_json_or_default::<Vec<ApplicationDto>>(
                    "applications",
                    &value,
                ));
            }
            RobotField::Reviews => {
                let reviews = parse_json_strict::<Vec<ReviewDto>>(&value).map_err(|_| {
                    AppError::field(
                        "reviews",
                        "Reviews must be a list with whole-number ratings",
                    )
                })?;
                input.reviews = Some(reviews);
            }
            RobotField::Status => {
                input.status = match parse_text(&value).as_deref() {
                    None | Some("") => None,
                    Some(status) => Some(
                        status
                            .parse::<RobotStatus>()
                            .map_err(|e| AppError::field("status", e))?,
                    ),
                };
            }
        }

        Ok(())
    }

    /// Attaches an uploaded file by its part name. Unknown parts are ignored.
    pub fn attach(&mut self, part_name: &str, file: UploadedFile) {
        match part_name.trim_end_matches("[]") {
            "featuredImage" => self.featured_image_file = Some(file),
            "images" => self.image_files.push(file),
            "videos" => self.video_files.push(file),
            other => tracing::debug!("Ignoring unexpected file part '{}'", other),
        }
    }

    /// Builds a form from a JSON object body.
    pub fn from_json(body: Map<String, Value>) -> Result<Self, AppError> {
        let mut form = Self::default();
        for (name, value) in body {
            if let Some(field) = RobotField::from_name(&name) {
                form.apply(field, value)?;
            }
        }
        Ok(form)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;

                // Browsers send an empty part for file inputs left blank
                if bytes.is_empty() {
                    continue;
                }

                form.attach(
                    &name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;

                if let Some(robot_field) = RobotField::from_name(name.trim_end_matches("[]")) {
                    form.apply(robot_field, Value::String(text))?;
                }
            }
        }

        Ok(form)
    }
}

fn manufacturer_mut(input: &mut RobotInputDto) -> &mut ManufacturerDto {
    input
        .manufacturer
        .get_or_insert_with(ManufacturerDto::default)
}

impl<S> FromRequest<S> for RobotForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Json(body) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_json(body)
        }
    }
}
