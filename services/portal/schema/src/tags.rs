use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::guide_tags::Entity")]
    GuideTags,
}

impl Related<super::guide_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuideTags.def()
    }
}

impl Related<super::guide_contents::Entity> for Entity {
    fn to() -> RelationDef {
        super::guide_tags::Relation::Guide.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::guide_tags::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
