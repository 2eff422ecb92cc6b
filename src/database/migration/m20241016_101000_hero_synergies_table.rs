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
                    .table(HeroSynergies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HeroSynergies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HeroSynergies::HeroId).integer().not_null())
                    .col(
                        ColumnDef::new(HeroSynergies::SynergyHeroId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HeroSynergies::WinRate).double().null())
                    .col(ColumnDef::new(HeroSynergies::Reason).text().null())
                    .col(
                        ColumnDef::new(HeroSynergies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HeroSynergies::Table, HeroSynergies::HeroId)
                            .to(Heroes::Table, Heroes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HeroSynergies::Table, HeroSynergies::SynergyHeroId)
                            .to(Heroes::Table, Heroes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HeroSynergies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HeroSynergies {
    Table,
    Id,
    HeroId,
    SynergyHeroId,
    WinRate,
    Reason,
    CreatedAt,
}
