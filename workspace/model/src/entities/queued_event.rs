use sea_orm::entity::prelude::*;

/// What happened to the transaction this event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum EventKind {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "updated")]
    Updated,
}

/// Queue lifecycle of an event row.
///
/// Pending rows are claimable once `available_at` has passed. Running
/// marks an in-flight claim; a worker crash leaves the row Running until
/// the stale-claim sweep returns it to Pending. Done and Failed are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum EventStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "running")]
    Running,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// One enqueued transaction event awaiting processing.
///
/// `snapshot` holds the transaction's serialized field map at enqueue
/// time. Workers re-read live state before acting on it, so the payload
/// is advisory; delivery is at-least-once and processing is idempotent.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "queued_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub kind: EventKind,
    /// Intentionally not a foreign key: the transaction may be deleted
    /// while the event waits, and the worker handles that case itself.
    pub transaction_id: i32,
    #[sea_orm(column_type = "Json")]
    pub snapshot: Json,
    pub status: EventStatus,
    #[sea_orm(default_value = "0")]
    pub attempts: i32,
    /// Earliest instant the event may be claimed. Pushed into the future
    /// by retry backoff.
    pub available_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub last_error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
