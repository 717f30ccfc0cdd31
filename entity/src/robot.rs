use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "robot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub name: String,
    pub manufacturer_name: String,
    pub manufacturer_country: Option<String>,
    pub manufacturer_website: Option<String>,
    pub year_introduced: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub specifications: Json,
    #[sea_orm(column_type = "Json", nullable)]
    pub featured_image: Option<Json>,
    #[sea_orm(column_type = "Json")]
    pub images: Json,
    #[sea_orm(column_type = "Json")]
    pub videos: Json,
    #[sea_orm(column_type = "Json")]
    pub applications: Json,
    #[sea_orm(column_type = "Json")]
    pub reviews: Json,
    pub status: String,
    pub views: i64,
    pub favorites: i64,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::robot_category::Entity")]
    RobotCategory,
}

impl Related<super::robot_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RobotCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
