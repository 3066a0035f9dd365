use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{account, category, entity, installment_plan, recurring_transaction, tag};

/// Whether money flowed in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum TransactionKind {
    #[sea_orm(string_value = "IN")]
    Income,
    #[sea_orm(string_value = "EX")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parses the human spelling used in rule expressions ("income",
    /// "expense") as well as the stored codes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "income" | "in" => Some(TransactionKind::Income),
            "expense" | "ex" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// A single money movement on an account.
///
/// `reference_date` is the month bucket the transaction counts toward and
/// is always normalized to the first day of its month. Rows are
/// soft-deleted first (`deleted` flag) and reaped later by the purge job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub kind: TransactionKind,
    #[sea_orm(default_value = "true")]
    pub is_paid: bool,
    pub date: NaiveDate,
    pub reference_date: NaiveDate,
    /// Non-negative; the sign is carried by `kind`. Truncated to the
    /// account currency's decimal places on every write.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub description: String,
    pub notes: Option<String>,
    pub category_id: Option<i32>,
    /// Set when this transaction was generated from an installment plan.
    pub installment_plan_id: Option<i32>,
    /// Ordinal within the plan, counted from the plan's `installment_start`.
    pub installment_number: Option<i32>,
    /// Set when this transaction was materialized from a recurring definition.
    pub recurring_transaction_id: Option<i32>,
    /// Free-form note writable only through rule actions, not user forms.
    pub internal_note: Option<String>,
    /// Correlation id for rule-driven upserts and external importers.
    pub internal_id: Option<String>,
    #[sea_orm(default_value = "false")]
    pub deleted: bool,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "installment_plan::Entity",
        from = "Column::InstallmentPlanId",
        to = "installment_plan::Column::Id",
        on_delete = "Cascade"
    )]
    InstallmentPlan,
    #[sea_orm(
        belongs_to = "recurring_transaction::Entity",
        from = "Column::RecurringTransactionId",
        to = "recurring_transaction::Column::Id",
        on_delete = "SetNull"
    )]
    RecurringTransaction,
    #[sea_orm(has_many = "super::transaction_tag::Entity")]
    TransactionTag,
    #[sea_orm(has_many = "super::transaction_entity::Entity")]
    TransactionEntity,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<installment_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstallmentPlan.def()
    }
}

impl Related<recurring_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTransaction.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::transaction_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::transaction_tag::Relation::Transaction.def().rev())
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        super::transaction_entity::Relation::Counterparty.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::transaction_entity::Relation::Transaction.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_accepts_spellings_and_codes() {
        assert_eq!(TransactionKind::parse("income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("Expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("IN"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("EX"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("transfer"), None);
    }

    #[test]
    fn test_kind_as_str_is_the_expression_spelling() {
        assert_eq!(TransactionKind::Income.as_str(), "income");
        assert_eq!(TransactionKind::Expense.as_str(), "expense");
    }
}
