//! One update run: fetch, transform, write, publish

use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info};

use crate::{
    config::AppConfig,
    errors::UpdaterError,
    graphql::TransitApi,
    models::Snapshot,
    snapshot::{publish, service_day, write_snapshot, PublishOutcome},
    transform::build_record,
};

/// Summary of a finished run
#[derive(Debug)]
pub struct UpdateReport {
    pub vehicle_count: usize,
    pub temp_path: PathBuf,
    pub publish: PublishOutcome,
}

/// Fetch all vehicles and their trips, in vehicle order, and build the snapshot
///
/// The snapshot is stamped when the positions arrive, not after the trip
/// fetches, so `lastUpdated` dates the position data.
pub async fn collect_snapshot<A: TransitApi>(
    api: &A,
    service_day: &str,
    short_label_max_len: usize,
) -> Result<Snapshot, UpdaterError> {
    let positions = api.fetch_vehicle_positions().await?;
    let last_updated = Utc::now().timestamp();
    info!("Received {} vehicle positions", positions.len());

    let mut records = Vec::with_capacity(positions.len());
    for position in &positions {
        let trip_id = position.trip_id();
        info!("Fetching data for {}", trip_id.unwrap_or("None"));

        let detail = match trip_id {
            Some(id) => api.fetch_trip_details(id, service_day).await?,
            None => None,
        };
        records.push(build_record(position, detail.as_ref(), short_label_max_len));
    }

    Ok(Snapshot {
        last_updated,
        vehicles: records,
    })
}

/// Run one full update
///
/// Fetch failures abort before anything is written. Once the temporary file is
/// written the run succeeds; publishing problems are reported in the returned
/// [`UpdateReport`].
pub async fn run_update<A: TransitApi>(
    api: &A,
    config: &AppConfig,
) -> Result<UpdateReport, UpdaterError> {
    let service_day = service_day();
    info!("Fetching vehicle positions...");

    let snapshot =
        collect_snapshot(api, &service_day, config.naming.short_label_max_len).await?;

    let temp_path = config.output.temp_path.clone();
    write_snapshot(&snapshot, &temp_path)?;

    let publish = publish(&temp_path, &config.output.static_path);
    if let PublishOutcome::Failed(e) = &publish {
        error!(
            "Error putting snapshot to the webserver location. ERROR: {}",
            e
        );
    }
    info!("Saved data to {}", temp_path.display());

    Ok(UpdateReport {
        vehicle_count: snapshot.vehicles.len(),
        temp_path,
        publish,
    })
}
