use sea_orm_migration::{prelude::*, schema::*};

use super::m20260301_000002_create_robot_table::Robot;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RobotCategory::Table)
                    .if_not_exists()
                    .col(integer(RobotCategory::RobotId))
                    .col(string(RobotCategory::Name))
                    .primary_key(
                        Index::create()
                            .col(RobotCategory::RobotId)
                            .col(RobotCategory::Name),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_robot_category_robot_id")
                            .from(RobotCategory::Table, RobotCategory::RobotId)
                            .to(Robot::Table, Robot::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_robot_category_name")
                    .table(RobotCategory::Table)
                    .col(RobotCategory::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RobotCategory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RobotCategory {
    Table,
    RobotId,
    Name,
}
