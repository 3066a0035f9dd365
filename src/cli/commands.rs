pub mod expand_plan;
pub mod generate_recurring;
pub mod initdb;
pub mod purge;
pub mod worker;

pub use expand_plan::expand_plan;
pub use generate_recurring::generate_recurring;
pub use initdb::init_database;
pub use purge::run_purge;
pub use worker::run_worker;
