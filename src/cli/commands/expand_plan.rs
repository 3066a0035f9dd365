use anyhow::Result;
use tracing::{info, trace};

use crate::config::{self, Settings};

pub async fn expand_plan(plan_id: i32) -> Result<()> {
    trace!("Entering expand_plan function");
    let settings = Settings::from_env();
    let db = config::connect(&settings.database_url).await?;

    let summary = engine::installment::expand_plan(&db, plan_id).await?;
    info!("{}", summary);

    Ok(())
}
