use crate::entity_iden::EntityIden;
use model::entities::prelude::*;
use model::entities::transaction;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Add deleted flag to transactions table
        manager
            .alter_table(
                Table::alter()
                    .table(Transaction::table())
                    .add_column(
                        ColumnDef::new(Transaction::column(transaction::Column::Deleted))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Add deleted_at timestamp to transactions table
        manager
            .alter_table(
                Table::alter()
                    .table(Transaction::table())
                    .add_column(
                        ColumnDef::new(Transaction::column(transaction::Column::DeletedAt))
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Transaction::table())
                    .drop_column(Transaction::column(transaction::Column::DeletedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Transaction::table())
                    .drop_column(Transaction::column(transaction::Column::Deleted))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
