use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFavorites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserFavorites::UserId).integer().not_null())
                    .col(ColumnDef::new(UserFavorites::GuideId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserFavorites::UserId)
                            .col(UserFavorites::GuideId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserFavorites::Table, UserFavorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserFavorites::Table, UserFavorites::GuideId)
                            .to(GuideContents::Table, GuideContents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFavorites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserFavorites {
    Table,
    UserId,
    GuideId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum GuideContents {
    Table,
    Id,
}
