use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{info, trace};

use crate::config::{self, Settings};

pub async fn run_purge(days: Option<i64>) -> Result<()> {
    trace!("Entering run_purge function");
    let settings = Settings::from_env();
    let db = config::connect(&settings.database_url).await?;

    let days = days.unwrap_or(settings.retention_days);
    let cutoff = Utc::now() - Duration::days(days);
    let summary = engine::purge::purge(&db, cutoff).await?;
    info!("{}", summary);

    Ok(())
}
