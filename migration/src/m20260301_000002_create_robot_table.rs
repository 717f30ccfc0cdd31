use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Robot::Table)
                    .if_not_exists()
                    .col(pk_auto(Robot::Id))
                    .col(string_uniq(Robot::Slug))
                    .col(string(Robot::Name))
                    .col(string(Robot::ManufacturerName))
                    .col(string_null(Robot::ManufacturerCountry))
                    .col(string_null(Robot::ManufacturerWebsite))
                    .col(integer_null(Robot::YearIntroduced))
                    .col(text_null(Robot::Summary))
                    .col(text_null(Robot::Description))
                    .col(json(Robot::Specifications))
                    .col(json_null(Robot::FeaturedImage))
                    .col(json(Robot::Images))
                    .col(json(Robot::Videos))
                    .col(json(Robot::Applications))
                    .col(json(Robot::Reviews))
                    .col(string(Robot::Status).default("draft"))
                    .col(big_integer(Robot::Views).default(0))
                    .col(big_integer(Robot::Favorites).default(0))
                    .col(integer_null(Robot::CreatedBy))
                    .col(integer_null(Robot::UpdatedBy))
                    .col(
                        timestamp_with_time_zone(Robot::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Robot::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_robot_created_by")
                            .from(Robot::Table, Robot::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_robot_updated_by")
                            .from(Robot::Table, Robot::UpdatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_robot_status_created_at")
                    .table(Robot::Table)
                    .col(Robot::Status)
                    .col(Robot::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Robot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Robot {
    Table,
    Id,
    Slug,
    Name,
    ManufacturerName,
    ManufacturerCountry,
    ManufacturerWebsite,
    YearIntroduced,
    Summary,
    Description,
    Specifications,
    FeaturedImage,
    Images,
    Videos,
    Applications,
    Reviews,
    Status,
    Views,
    Favorites,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
