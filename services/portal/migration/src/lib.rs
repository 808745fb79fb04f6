use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_activation_codes;
mod m20260301_000003_create_categories;
mod m20260301_000004_create_tags;
mod m20260301_000005_create_guide_contents;
mod m20260301_000006_create_guide_tags;
mod m20260301_000007_create_user_favorites;
mod m20260301_000008_create_feedbacks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_activation_codes::Migration),
            Box::new(m20260301_000003_create_categories::Migration),
            Box::new(m20260301_000004_create_tags::Migration),
            Box::new(m20260301_000005_create_guide_contents::Migration),
            Box::new(m20260301_000006_create_guide_tags::Migration),
            Box::new(m20260301_000007_create_user_favorites::Migration),
            Box::new(m20260301_000008_create_feedbacks::Migration),
        ]
    }
}
