use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create queued_events table
        manager
            .create_table(
                Table::create()
                    .table(QueuedEvents::Table)
                    .if_not_exists()
                    .col(big_integer(QueuedEvents::Id).auto_increment().primary_key())
                    .col(string(QueuedEvents::Kind).string_len(10))
                    // No foreign key here: events must outlive their transaction
                    .col(integer(QueuedEvents::TransactionId))
                    .col(json(QueuedEvents::Snapshot))
                    .col(string(QueuedEvents::Status).string_len(10))
                    .col(integer(QueuedEvents::Attempts).default(0))
                    .col(timestamp_with_time_zone(QueuedEvents::AvailableAt))
                    .col(timestamp_with_time_zone(QueuedEvents::CreatedAt))
                    .col(string_null(QueuedEvents::LastError))
                    .to_owned(),
            )
            .await?;

        // The claim query scans pending rows ordered by availability
        manager
            .create_index(
                Index::create()
                    .name("idx_queued_events_status_available_at")
                    .table(QueuedEvents::Table)
                    .col(QueuedEvents::Status)
                    .col(QueuedEvents::AvailableAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QueuedEvents::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum QueuedEvents {
    Table,
    Id,
    Kind,
    TransactionId,
    Snapshot,
    Status,
    Attempts,
    AvailableAt,
    CreatedAt,
    LastError,
}
