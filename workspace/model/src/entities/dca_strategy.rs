use sea_orm::entity::prelude::*;

use super::currency;

/// A dollar-cost-averaging strategy: recurring purchases of one currency
/// paid for in another, tracked entry by entry.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dca_strategies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// The currency being accumulated.
    pub target_currency_id: i32,
    /// The currency purchases are paid in.
    pub payment_currency_id: i32,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "currency::Entity",
        from = "Column::TargetCurrencyId",
        to = "currency::Column::Id"
    )]
    TargetCurrency,
    #[sea_orm(
        belongs_to = "currency::Entity",
        from = "Column::PaymentCurrencyId",
        to = "currency::Column::Id"
    )]
    PaymentCurrency,
    #[sea_orm(has_many = "super::dca_entry::Entity")]
    DcaEntry,
}

impl Related<super::dca_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DcaEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
