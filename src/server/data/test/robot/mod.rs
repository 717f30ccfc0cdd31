use crate::{
    model::robot::{ManufacturerDto, RobotStatus, SpecificationsDto},
    server::{
        data::robot::RobotRepository,
        model::robot::{CreateRobotParams, RobotFilter, UpdateRobotParams},
    },
};
use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory::robot::RobotFactory};

mod categories;
mod delete;
mod list;
mod related;

fn create_params(slug: &str, name: &str, categories: &[&str]) -> CreateRobotParams {
    CreateRobotParams {
        slug: slug.to_string(),
        name: name.to_string(),
        manufacturer: ManufacturerDto {
            name: "Boston Dynamics".to_string(),
            country: Some("USA".to_string()),
            website: None,
        },
        year_introduced: Some(2013),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        summary: None,
        description: None,
        specifications: SpecificationsDto::default(),
        featured_image: None,
        images: Vec::new(),
        videos: Vec::new(),
        applications: Vec::new(),
        reviews: Vec::new(),
        status: RobotStatus::Draft,
        created_by: Some(1),
    }
}
