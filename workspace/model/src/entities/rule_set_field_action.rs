use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction fields a rule action may assign or filter on.
///
/// `internal_note` and `internal_id` are writable through rules only; the
/// rest mirror the user-editable transaction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    #[sea_orm(string_value = "account")]
    Account,
    #[sea_orm(string_value = "kind")]
    Kind,
    #[sea_orm(string_value = "is_paid")]
    IsPaid,
    #[sea_orm(string_value = "date")]
    Date,
    #[sea_orm(string_value = "reference_date")]
    ReferenceDate,
    #[sea_orm(string_value = "amount")]
    Amount,
    #[sea_orm(string_value = "description")]
    Description,
    #[sea_orm(string_value = "notes")]
    Notes,
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "tags")]
    Tags,
    #[sea_orm(string_value = "entities")]
    Entities,
    #[sea_orm(string_value = "internal_note")]
    InternalNote,
    #[sea_orm(string_value = "internal_id")]
    InternalId,
}

/// "Set field to expression result" action. Each action assigns one field;
/// a rule carries at most one action per field (enforced by a unique index
/// on `(rule_id, field)`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rule_set_field_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_id: i32,
    /// Actions of a rule apply in (position, id) order.
    #[sea_orm(default_value = "0")]
    pub position: i32,
    pub field: TargetField,
    /// Expression whose result is coerced into the target field.
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction_rule::Entity",
        from = "Column::RuleId",
        to = "super::transaction_rule::Column::Id",
        on_delete = "Cascade"
    )]
    TransactionRule,
}

impl Related<super::transaction_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
