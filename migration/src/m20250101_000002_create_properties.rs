use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Properties::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Properties::PropertyId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Properties::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Properties::Address).json().not_null())
                    .col(ColumnDef::new(Properties::Bedrooms).double().not_null().default(0.0))
                    .col(ColumnDef::new(Properties::Baths).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Properties::SquareFootage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Properties::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Properties::Status)
                            .string_len(32)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Properties::Notes)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Properties::Image).string())
                    .col(ColumnDef::new(Properties::TaxRate).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Properties::TaxAmountDue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Properties::MaxOccupancy)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_properties_owner_id")
                    .table(Properties::Table)
                    .col(Properties::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    PropertyId,
    OwnerId,
    Address,
    Bedrooms,
    Baths,
    SquareFootage,
    IsAvailable,
    Status,
    Notes,
    Image,
    TaxRate,
    TaxAmountDue,
    MaxOccupancy,
}
