use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::rule_set_field_action::TargetField;

/// How a filter term compares its column against the term value.
/// String operators apply to text columns; the ordered operators apply to
/// anything with a natural order (amounts, dates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOperator {
    Eq,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Lt,
    Gte,
    Lte,
}

/// One conjunct of an upsert action's match filter. `value` is an
/// expression evaluated against the triggering snapshot before the lookup
/// runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTerm {
    pub field: TargetField,
    pub operator: SearchOperator,
    pub value: String,
}

/// One field assignment applied to the matched (or newly created) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: TargetField,
    pub value: String,
}

/// The ANDed filter terms of an upsert action, stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct FilterList(pub Vec<FilterTerm>);

/// The assignments of an upsert action, stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AssignmentList(pub Vec<FieldAssignment>);

/// "Update a matching transaction or create one" action.
///
/// The guard expression gates the whole action (empty guard always
/// passes). The filter must select at most one transaction; matching more
/// than one is a configuration error surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rule_upsert_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_id: i32,
    /// Actions of a rule apply in (position, id) order.
    #[sea_orm(default_value = "0")]
    pub position: i32,
    pub guard: String,
    #[sea_orm(column_type = "Json")]
    pub filter: FilterList,
    #[sea_orm(column_type = "Json")]
    pub set_values: AssignmentList,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_list_json_shape() {
        let filter = FilterList(vec![FilterTerm {
            field: TargetField::Description,
            operator: SearchOperator::StartsWith,
            value: "'Salary'".to_string(),
        }]);

        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"[{"field":"description","operator":"startswith","value":"'Salary'"}]"#
        );
        assert_eq!(serde_json::from_str::<FilterList>(&json).unwrap(), filter);
    }

    #[test]
    fn test_assignment_list_json_shape() {
        let json = r#"[{"field":"internal_id","value":"internal_id"}]"#;
        let assignments: AssignmentList = serde_json::from_str(json).unwrap();
        assert_eq!(assignments.0.len(), 1);
        assert_eq!(assignments.0[0].field, TargetField::InternalId);
    }
}
