use sea_orm::entity::prelude::*;

use super::{entity, installment_plan};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "installment_plans_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub installment_plan_id: i32,
    #[sea_orm(primary_key)]
    pub entity_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "installment_plan::Entity",
        from = "Column::InstallmentPlanId",
        to = "installment_plan::Column::Id",
        on_delete = "Cascade"
    )]
    InstallmentPlan,
    #[sea_orm(
        belongs_to = "entity::Entity",
        from = "Column::EntityId",
        to = "entity::Column::Id",
        on_delete = "Cascade"
    )]
    Counterparty,
}

impl Related<installment_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstallmentPlan.def()
    }
}

impl Related<entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counterparty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
