use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{info, trace, warn};

use crate::config::{self, Settings};

pub async fn generate_recurring(today: Option<NaiveDate>) -> Result<()> {
    trace!("Entering generate_recurring function");
    let settings = Settings::from_env();
    let db = config::connect(&settings.database_url).await?;

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let summary = engine::recurring::generate_due(&db, today).await?;
    info!("{}", summary);
    for failure in &summary.failures {
        warn!(
            "Definition {} failed: {}",
            failure.definition_id, failure.message
        );
    }

    Ok(())
}
