//! Transaction automation engine.
//!
//! Everything here runs against the shared model crate: the write path
//! that feeds the event queue, the queue itself, rule evaluation, and
//! the batch jobs that materialize recurring definitions and installment
//! plans. The daemon binary wires these pieces to a database and a
//! scheduler; this crate owns the semantics.

pub mod dca;
pub mod error;
pub mod expr;
pub mod installment;
pub mod purge;
pub mod queue;
pub mod recurring;
pub mod rules;
pub mod schedule;
pub mod snapshot;
pub mod writer;

#[cfg(test)]
pub mod testing;

pub use error::{EngineError, Result};
