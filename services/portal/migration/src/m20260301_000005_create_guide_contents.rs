use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuideContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuideContents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuideContents::CategoryId).integer().not_null())
                    .col(ColumnDef::new(GuideContents::Title).string_len(100).not_null())
                    .col(ColumnDef::new(GuideContents::Summary).string_len(255))
                    .col(ColumnDef::new(GuideContents::Content).text().not_null())
                    .col(ColumnDef::new(GuideContents::IconUrl).string_len(255))
                    .col(ColumnDef::new(GuideContents::CoverImageUrl).string_len(255))
                    .col(ColumnDef::new(GuideContents::AudioUrl).string_len(255))
                    .col(ColumnDef::new(GuideContents::VideoUrl).string_len(255))
                    .col(
                        ColumnDef::new(GuideContents::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GuideContents::LikeCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GuideContents::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(GuideContents::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GuideContents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GuideContents::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GuideContents::Table, GuideContents::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(GuideContents::Table)
                    .col(GuideContents::CategoryId)
                    .name("idx_guide_contents_category_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(GuideContents::Table)
                    .col(GuideContents::IsPublished)
                    .col(GuideContents::CreatedAt)
                    .name("idx_guide_contents_published_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuideContents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuideContents {
    Table,
    Id,
    CategoryId,
    Title,
    Summary,
    Content,
    IconUrl,
    CoverImageUrl,
    AudioUrl,
    VideoUrl,
    ViewCount,
    LikeCount,
    IsPublished,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}
