use sea_orm::entity::prelude::*;

use super::{installment_plan, tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "installment_plans_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub installment_plan_id: i32,
    #[sea_orm(primary_key)]
    pub tag_id: i32,
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
        belongs_to = "tag::Entity",
        from = "Column::TagId",
        to = "tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<installment_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstallmentPlan.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
