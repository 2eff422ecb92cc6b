use sea_orm_migration::prelude::*;

use super::m20241016_100000_heroes_table::Heroes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HeroBuilds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeroBuilds::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeroBuilds::HeroId).integer().not_null())
                    .col(ColumnDef::new(HeroBuilds::Name).string_len(100).not_null())
                    .col(ColumnDef::new(HeroBuilds::Description).text().null())
                    .col(ColumnDef::new(HeroBuilds::Items).json().not_null())
                    .col(ColumnDef::new(HeroBuilds::Skills).json().not_null())
                    .col(ColumnDef::new(HeroBuilds::Talents).json().null())
                    .col(ColumnDef::new(HeroBuilds::Playstyle).string_len(50).null())
                    .col(
                        ColumnDef::new(HeroBuilds::Votes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HeroBuilds::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HeroBuilds::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HeroBuilds::Table, HeroBuilds::HeroId)
                            .to(Heroes::Table, Heroes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HeroBuilds::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum HeroBuilds {
    Table,
    Id,
    HeroId,
    Name,
    Description,
    Items,
    Skills,
    Talents,
    Playstyle,
    Votes,
    CreatedAt,
    UpdatedAt,
}
