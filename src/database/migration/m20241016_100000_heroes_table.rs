use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Heroes::Table)
                    .if_not_exists()
                    // Hero IDs come from the stats provider so they aren't auto incremented
                    .col(
                        ColumnDef::new(Heroes::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Heroes::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Heroes::LocalizedName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Heroes::PrimaryAttr).string_len(20).null())
                    .col(ColumnDef::new(Heroes::AttackType).string_len(20).null())
                    .col(ColumnDef::new(Heroes::Roles).json().not_null())
                    .col(
                        ColumnDef::new(Heroes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Heroes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Heroes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Heroes {
    Table,
    Id,
    Name,
    LocalizedName,
    PrimaryAttr,
    AttackType,
    Roles,
    CreatedAt,
    UpdatedAt,
}
