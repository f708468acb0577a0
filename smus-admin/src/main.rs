//! SMUS administration tool.
//!
//! Bulk operations against a SageMaker Unified Studio domain: glossary
//! loading, metadata backfill and backup, asset republishing and import of
//! Glue tables through Lake Formation.

use clap::Parser;
use smus_admin::{
    Cli,
    commands::{self, Services},
};
use smus_core::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_json)?;

    let outcome = execute(&cli).await.map_err(|e| {
        error!("Command failed: {:#}", e);
        e
    })?;

    println!("{}", commands::render(&outcome)?);
    Ok(())
}

#[cfg(feature = "aws")]
async fn execute(cli: &Cli) -> anyhow::Result<commands::Outcome> {
    let session = cli.global.session_config();
    info!(
        "Connecting to AWS (region: {})",
        session.region.as_deref().unwrap_or("default")
    );

    let aws = smus_core::adapters::connect(&session).await?;
    let services = Services {
        catalog: &aws.catalog,
        permissions: &aws.permissions,
        tables: &aws.tables,
    };

    commands::run(&cli.command, &cli.global, &services).await
}

#[cfg(not(feature = "aws"))]
async fn execute(_cli: &Cli) -> anyhow::Result<commands::Outcome> {
    info!("No service backend available");
    anyhow::bail!("smus-admin was built without the `aws` feature; rebuild with --features aws")
}
