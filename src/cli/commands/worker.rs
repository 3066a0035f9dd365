use anyhow::Result;
use tracing::{info, trace};

use crate::config::{self, Settings};
use crate::{scheduler, worker};

pub async fn run_worker(once: bool) -> Result<()> {
    trace!("Entering run_worker function");
    let settings = Settings::from_env();
    let db = config::connect(&settings.database_url).await?;

    if once {
        let processed = worker::drain(&db).await?;
        info!("Processed {} queued events", processed);
        return Ok(());
    }

    // Daemon mode: the worker pool and the daily batch scheduler run
    // side by side; either one failing stops the process.
    tokio::try_join!(worker::run(&db, &settings), scheduler::run(&db, &settings))?;
    Ok(())
}
