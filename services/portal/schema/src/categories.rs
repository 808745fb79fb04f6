use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub icon_url: Option<String>,
    pub description: Option<String>,
    /// Ascending display order.
    pub sort_order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guide_contents::Entity")]
    GuideContents,
}

impl Related<super::guide_contents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideContents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
