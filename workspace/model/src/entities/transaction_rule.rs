use sea_orm::entity::prelude::*;

use super::queued_event::EventKind;

/// A user-configured automation rule.
///
/// `trigger` holds the boolean expression evaluated against a transaction
/// snapshot; the rule's actions run only when it evaluates to true. Rules
/// apply in primary key order, so earlier rules' effects are visible to
/// later ones.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transaction_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(default_value = "true")]
    pub active: bool,
    /// Run this rule when a transaction is created.
    #[sea_orm(default_value = "true")]
    pub on_create: bool,
    /// Run this rule when a transaction is updated.
    #[sea_orm(default_value = "false")]
    pub on_update: bool,
    pub trigger: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rule_set_field_action::Entity")]
    SetFieldAction,
    #[sea_orm(has_many = "super::rule_upsert_action::Entity")]
    UpsertAction,
}

impl Related<super::rule_set_field_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SetFieldAction.def()
    }
}

impl Related<super::rule_upsert_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UpsertAction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this rule is selected for an event of the given kind.
    /// A rule with both flags off never fires.
    pub fn fires_on(&self, kind: EventKind) -> bool {
        self.active
            && match kind {
                EventKind::Created => self.on_create,
                EventKind::Updated => self.on_update,
            }
    }
}
