use super::*;
use crate::{
    model::robot::{ReviewDto, RobotStatus},
    server::{
        data::robot::RobotRepository, model::robot::RobotFilter, service::robot::RobotService,
        storage::LocalMediaStorage,
    },
};
use test_utils::{builder::TestBuilder, factory::robot::RobotFactory};

mod aggregates;
mod create;
mod get;
mod update;

/// Maps a `/uploads/...` URL to the file written below the storage root.
fn stored_path(storage: &LocalMediaStorage, url: &str) -> std::path::PathBuf {
    storage.root().join(url.trim_start_matches("/uploads/"))
}
