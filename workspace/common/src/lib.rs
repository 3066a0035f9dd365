//! Shared contract types between the automation engine and the daemon.
//! The snapshot map is the payload format queued events carry and the
//! context rule expressions evaluate against; the run summaries are what
//! the batch entry points hand back to the scheduler and the CLI.

mod snapshot;
mod summary;

pub use snapshot::{Snapshot, Value};
pub use summary::{
    DefinitionFailure, InstallmentRunSummary, PurgeRunSummary, RecurringRunSummary,
};
