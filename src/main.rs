//! Train data updater utility

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use train_updater::{
    config::AppConfig, errors::UpdaterError, graphql::HttpTransitApi, updater::run_update,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    #[cfg(feature = "dotenvy")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        // Snapshot written but not published
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("Update failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, UpdaterError> {
    let config = AppConfig::load()?;
    config.validate()?;

    let api = HttpTransitApi::new(&config.graphql, &config.region)?;
    let report = run_update(&api, &config).await?;

    info!(
        "Update finished: {} vehicles, published: {}",
        report.vehicle_count,
        report.publish.is_published()
    );
    Ok(report.publish.is_published())
}
