use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuideTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GuideTags::GuideId).integer().not_null())
                    .col(ColumnDef::new(GuideTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(GuideTags::GuideId)
                            .col(GuideTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GuideTags::Table, GuideTags::GuideId)
                            .to(GuideContents::Table, GuideContents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GuideTags::Table, GuideTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(GuideTags::Table)
                    .col(GuideTags::TagId)
                    .name("idx_guide_tags_tag_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuideTags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GuideTags {
    Table,
    GuideId,
    TagId,
}

#[derive(Iden)]
enum GuideContents {
    Table,
    Id,
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
}
