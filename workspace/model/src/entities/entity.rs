use sea_orm::entity::prelude::*;

/// A counterparty a transaction involves: a merchant, an employer, a
/// person. Transactions can reference any number of entities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(default_value = "true")]
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction_entity::Entity")]
    TransactionEntity,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        super::transaction_entity::Relation::Transaction.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::transaction_entity::Relation::Counterparty.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
