use sea_orm::entity::prelude::*;

use super::{entity, transaction};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    #[sea_orm(primary_key)]
    pub entity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "transaction::Entity",
        from = "Column::TransactionId",
        to = "transaction::Column::Id",
        on_delete = "Cascade"
    )]
    Transaction,
    #[sea_orm(
        belongs_to = "entity::Entity",
        from = "Column::EntityId",
        to = "entity::Column::Id",
        on_delete = "Cascade"
    )]
    Counterparty,
}

impl Related<transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counterparty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
