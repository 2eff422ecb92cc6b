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
                    .table(HeroCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeroCounters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeroCounters::HeroId).integer().not_null())
                    .col(
                        ColumnDef::new(HeroCounters::CounterHeroId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HeroCounters::WinRate).double().null())
                    .col(ColumnDef::new(HeroCounters::Reason).text().null())
                    .col(
                        ColumnDef::new(HeroCounters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HeroCounters::Table, HeroCounters::HeroId)
                            .to(Heroes::Table, Heroes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HeroCounters::Table, HeroCounters::CounterHeroId)
                            .to(Heroes::Table, Heroes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A hero can only be listed once as a counter of the same hero
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("idx-hero-counter-pair")
                    .table(HeroCounters::Table)
                    .col(HeroCounters::HeroId)
                    .col(HeroCounters::CounterHeroId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(HeroCounters::Table)
                    .name("idx-hero-counter-pair")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(HeroCounters::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HeroCounters {
    Table,
    Id,
    HeroId,
    CounterHeroId,
    WinRate,
    Reason,
    CreatedAt,
}
