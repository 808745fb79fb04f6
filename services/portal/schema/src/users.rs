use sea_orm::entity::prelude::*;

/// Portal account. `phone` is the login identifier.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub phone: String,
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub is_paid: bool,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feedbacks::Entity")]
    Feedbacks,
    #[sea_orm(has_many = "super::user_favorites::Entity")]
    UserFavorites,
}

impl Related<super::feedbacks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl Related<super::user_favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserFavorites.def()
    }
}

impl Related<super::guide_contents::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_favorites::Relation::Guide.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_favorites::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
