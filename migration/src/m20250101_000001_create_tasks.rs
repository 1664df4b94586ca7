use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::TaskId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Tasks::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Tasks::WorkerId).uuid())
                    .col(ColumnDef::new(Tasks::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Tasks::Category)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Tasks::Priority)
                            .string_len(32)
                            .not_null()
                            .default("low"),
                    )
                    .col(
                        ColumnDef::new(Tasks::TakePrecedence)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tasks::Details).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Tasks::Notes)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Tasks::ScheduledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::StartedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::PausedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::PausedReason).string_len(255))
                    .col(ColumnDef::new(Tasks::FailedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Tasks::FailedReason).string_len(255))
                    .col(
                        ColumnDef::new(Tasks::EstimatedCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Tasks::ActualCost)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Tasks::Profit).double().not_null().default(0.0))
                    .col(ColumnDef::new(Tasks::Image).string())
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_owner_id")
                    .table(Tasks::Table)
                    .col(Tasks::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_property_id")
                    .table(Tasks::Table)
                    .col(Tasks::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    TaskId,
    OwnerId,
    PropertyId,
    WorkerId,
    Name,
    Category,
    Priority,
    TakePrecedence,
    Details,
    Notes,
    ScheduledAt,
    StartedAt,
    CompletedAt,
    PausedAt,
    PausedReason,
    FailedAt,
    FailedReason,
    EstimatedCost,
    ActualCost,
    Profit,
    Image,
    CreatedAt,
    UpdatedAt,
}
