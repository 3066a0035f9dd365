use sea_orm::entity::prelude::*;

/// Represents a financial account, like a bank account, credit card, or
/// cash wallet. Every transaction belongs to exactly one account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Optional grouping for presentation purposes.
    pub group_id: Option<i32>,
    pub currency_id: i32,
    /// Asset accounts track holdings rather than spending money.
    #[sea_orm(default_value = "false")]
    pub is_asset: bool,
    /// Archived accounts are hidden from pickers but keep their history.
    #[sea_orm(default_value = "false")]
    pub is_archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_group::Entity",
        from = "Column::GroupId",
        to = "super::account_group::Column::Id",
        on_delete = "SetNull"
    )]
    AccountGroup,
    #[sea_orm(
        belongs_to = "super::currency::Entity",
        from = "Column::CurrencyId",
        to = "super::currency::Column::Id"
    )]
    Currency,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
}

impl Related<super::account_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountGroup.def()
    }
}

impl Related<super::currency::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Currency.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
