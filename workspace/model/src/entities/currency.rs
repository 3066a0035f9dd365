use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

/// A currency accounts are denominated in. `decimal_places` is the minor
/// unit precision every stored amount is truncated to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "currencies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// ISO 4217 style code, e.g. "USD", "EUR". Unique.
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub decimal_places: i16,
    /// Symbol rendered before the amount, e.g. "$".
    pub prefix: Option<String>,
    /// Symbol rendered after the amount, e.g. " Kč".
    pub suffix: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Truncates an amount to this currency's minor unit. Truncation, not
    /// rounding: 0.019 in a 2-place currency becomes 0.01.
    pub fn truncate(&self, amount: Decimal) -> Decimal {
        amount.trunc_with_scale(self.decimal_places.max(0) as u32)
    }

    /// The smallest representable step in this currency, e.g. 0.01 for a
    /// 2-place currency.
    pub fn minor_unit(&self) -> Decimal {
        Decimal::new(1, self.decimal_places.max(0) as u32)
    }
}
