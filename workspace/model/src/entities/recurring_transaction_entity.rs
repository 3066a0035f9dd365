use sea_orm::entity::prelude::*;

use super::{entity, recurring_transaction};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_transactions_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub recurring_transaction_id: i32,
    #[sea_orm(primary_key)]
    pub entity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "recurring_transaction::Entity",
        from = "Column::RecurringTransactionId",
        to = "recurring_transaction::Column::Id",
        on_delete = "Cascade"
    )]
    RecurringTransaction,
    #[sea_orm(
        belongs_to = "entity::Entity",
        from = "Column::EntityId",
        to = "entity::Column::Id",
        on_delete = "Cascade"
    )]
    Counterparty,
}

impl Related<recurring_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringTransaction.def()
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counterparty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
