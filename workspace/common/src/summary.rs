use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recurring definition that could not be processed during a batch run.
/// The run carries on past it; the failure is reported here instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionFailure {
    pub definition_id: i32,
    pub message: String,
}

/// Outcome of one recurring generation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRunSummary {
    /// The "today" the batch ran against.
    pub run_date: NaiveDate,
    /// Definitions that were due for inspection (paused ones excluded).
    pub definitions_seen: usize,
    pub transactions_created: usize,
    pub failures: Vec<DefinitionFailure>,
}

impl RecurringRunSummary {
    pub fn new(run_date: NaiveDate) -> Self {
        Self {
            run_date,
            definitions_seen: 0,
            transactions_created: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, definition_id: i32, message: impl Into<String>) {
        self.failures.push(DefinitionFailure {
            definition_id,
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RecurringRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "recurring run {}: {} definitions seen, {} transactions created, {} failed",
            self.run_date,
            self.definitions_seen,
            self.transactions_created,
            self.failures.len()
        )
    }
}

/// Outcome of expanding one installment plan into its transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRunSummary {
    pub plan_id: i32,
    pub installments_created: usize,
    /// Previously generated transactions that were replaced by this run.
    pub replaced: usize,
}

impl fmt::Display for InstallmentRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "plan {}: {} installments created ({} replaced)",
            self.plan_id, self.installments_created, self.replaced
        )
    }
}

/// Outcome of one retention sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurgeRunSummary {
    /// Rows soft-deleted (or events finished) before this instant were
    /// eligible.
    pub cutoff: DateTime<Utc>,
    pub transactions_purged: u64,
    pub events_purged: u64,
}

impl fmt::Display for PurgeRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "purge: removed {} transactions and {} finished events older than {}",
            self.transactions_purged, self.events_purged, self.cutoff
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurring_summary_reporting() {
        let mut summary =
            RecurringRunSummary::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        summary.definitions_seen = 3;
        summary.transactions_created = 5;
        assert!(summary.is_clean());

        summary.record_failure(7, "account is archived");
        assert!(!summary.is_clean());
        assert_eq!(
            summary.to_string(),
            "recurring run 2024-03-15: 3 definitions seen, 5 transactions created, 1 failed"
        );
    }

    #[test]
    fn test_installment_summary_display() {
        let summary = InstallmentRunSummary {
            plan_id: 12,
            installments_created: 3,
            replaced: 3,
        };
        assert_eq!(summary.to_string(), "plan 12: 3 installments created (3 replaced)");
    }

    #[test]
    fn test_purge_summary_display() {
        let summary = PurgeRunSummary {
            cutoff: "2024-03-15T00:00:00Z".parse().unwrap(),
            transactions_purged: 4,
            events_purged: 10,
        };
        assert_eq!(
            summary.to_string(),
            "purge: removed 4 transactions and 10 finished events older than 2024-03-15 00:00:00 UTC"
        );
    }
}
