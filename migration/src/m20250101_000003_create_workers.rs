use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workers::WorkerId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Workers::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Workers::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Workers::Specialization)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Workers::PayRate).double().not_null().default(0.0))
                    .col(ColumnDef::new(Workers::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Workers::EndDate).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workers_owner_id")
                    .table(Workers::Table)
                    .col(Workers::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Workers {
    Table,
    Id,
    WorkerId,
    OwnerId,
    Title,
    Specialization,
    PayRate,
    StartDate,
    EndDate,
}
