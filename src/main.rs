use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod scheduler;
mod worker;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    model::init_tracing();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
