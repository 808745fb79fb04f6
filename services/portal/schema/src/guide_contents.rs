use sea_orm::entity::prelude::*;

/// Long-form article. `content` is markdown.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guide_contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub title: String,
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub icon_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    /// Only ever incremented.
    pub view_count: i32,
    /// Only ever incremented.
    pub like_count: i32,
    pub is_published: bool,
    pub is_featured: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::guide_tags::Entity")]
    GuideTags,
    #[sea_orm(has_many = "super::user_favorites::Entity")]
    UserFavorites,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::guide_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideTags.def()
    }
}

impl Related<super::user_favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFavorites.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_tags::Relation::Guide.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
