use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{account, category, entity, recurring_transaction::RecurrenceUnit, tag};
use super::transaction::TransactionKind;

/// A lump sum split into a sequence of future installment transactions.
///
/// The splitter guarantees the generated amounts add up to `total_amount`
/// exactly; regeneration replaces the previously generated set instead of
/// appending to it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "installment_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub kind: TransactionKind,
    pub description: String,
    pub notes: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub total_amount: Decimal,
    /// How many transactions the total splits into, at least 1.
    pub number_of_installments: i32,
    /// Number shown on the first installment. Lets a plan represent a tail
    /// of a longer series, e.g. installments 4..12 of 12.
    #[sea_orm(default_value = "1")]
    pub installment_start: i32,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
    /// Month bucket override for the first installment, stepped like the
    /// due date for the rest. Null buckets each installment by due month.
    pub reference_date: Option<NaiveDate>,
    pub recurrence_unit: RecurrenceUnit,
    #[sea_orm(default_value = "1")]
    pub recurrence_interval: i32,
    pub category_id: Option<i32>,
    #[sea_orm(default_value = "true")]
    pub add_description_to_transaction: bool,
    #[sea_orm(default_value = "true")]
    pub add_notes_to_transaction: bool,
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
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
    #[sea_orm(has_many = "super::installment_plan_tag::Entity")]
    InstallmentPlanTag,
    #[sea_orm(has_many = "super::installment_plan_entity::Entity")]
    InstallmentPlanEntity,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::installment_plan_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::installment_plan_tag::Relation::InstallmentPlan.def().rev())
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        super::installment_plan_entity::Relation::Counterparty.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::installment_plan_entity::Relation::InstallmentPlan.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Denominator used when rendering "(k/N)" suffixes on installment
    /// descriptions.
    pub fn series_total(&self) -> i32 {
        self.installment_start - 1 + self.number_of_installments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_series_total_with_offset_start() {
        let plan = Model {
            id: 1,
            account_id: 1,
            kind: TransactionKind::Expense,
            description: "Phone".to_string(),
            notes: None,
            total_amount: Decimal::from_str("900.00").unwrap(),
            number_of_installments: 9,
            installment_start: 4,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            reference_date: None,
            recurrence_unit: RecurrenceUnit::Month,
            recurrence_interval: 1,
            category_id: None,
            add_description_to_transaction: true,
            add_notes_to_transaction: true,
        };
        assert_eq!(plan.series_total(), 12);
    }
}
