pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tables;
mod m20240601_000001_create_queued_events;
mod m20240901_000001_add_soft_delete;
pub mod entity_iden;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_tables::Migration),
            Box::new(m20240601_000001_create_queued_events::Migration),
            Box::new(m20240901_000001_add_soft_delete::Migration),
        ]
    }
}
