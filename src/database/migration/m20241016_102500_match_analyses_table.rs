use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MatchAnalyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MatchAnalyses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MatchAnalyses::MatchId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MatchAnalyses::RadiantWin).boolean().null())
                    .col(ColumnDef::new(MatchAnalyses::Duration).big_integer().null())
                    .col(ColumnDef::new(MatchAnalyses::Analysis).json().null())
                    .col(
                        ColumnDef::new(MatchAnalyses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MatchAnalyses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MatchAnalyses {
    Table,
    Id,
    /// Stats provider ID of the match
    MatchId,
    RadiantWin,
    /// Duration of the match in seconds
    Duration,
    /// JSON analysis blob
    Analysis,
    CreatedAt,
}
