use sea_orm_migration::prelude::*;

use super::m20241016_101500_hero_builds_table::HeroBuilds;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BuildComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BuildComments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BuildComments::BuildId).integer().not_null())
                    .col(
                        ColumnDef::new(BuildComments::Author)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BuildComments::Content).text().not_null())
                    .col(ColumnDef::new(BuildComments::Rating).integer().null())
                    .col(
                        ColumnDef::new(BuildComments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(BuildComments::Table, BuildComments::BuildId)
                            .to(HeroBuilds::Table, HeroBuilds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BuildComments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BuildComments {
    Table,
    Id,
    BuildId,
    Author,
    Content,
    Rating,
    CreatedAt,
}
