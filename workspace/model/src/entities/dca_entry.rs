use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{dca_strategy, transaction};

/// One purchase within a DCA strategy.
///
/// An entry may link an expense transaction (the payment) and an income
/// transaction (the received amount). When a linked transaction's amount
/// changes, the matching side of the entry is kept in sync: the expense
/// leg mirrors into `amount_paid`, the income leg into `amount_received`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dca_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub strategy_id: i32,
    pub date: NaiveDate,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount_received: Decimal,
    pub expense_transaction_id: Option<i32>,
    pub income_transaction_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "dca_strategy::Entity",
        from = "Column::StrategyId",
        to = "dca_strategy::Column::Id",
        on_delete = "Cascade"
    )]
    DcaStrategy,
    #[sea_orm(
        belongs_to = "transaction::Entity",
        from = "Column::ExpenseTransactionId",
        to = "transaction::Column::Id",
        on_delete = "SetNull"
    )]
    ExpenseTransaction,
    #[sea_orm(
        belongs_to = "transaction::Entity",
        from = "Column::IncomeTransactionId",
        to = "transaction::Column::Id",
        on_delete = "SetNull"
    )]
    IncomeTransaction,
}

impl Related<dca_strategy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DcaStrategy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
