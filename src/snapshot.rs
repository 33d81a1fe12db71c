//! Snapshot writing and publishing

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use tracing::{info, warn};

use crate::{errors::UpdaterError, models::Snapshot};

/// Service day of `now`, in the time zone `now` carries, as `YYYY-MM-DD`
pub fn service_day_at<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y-%m-%d").to_string()
}

/// Current service day in the local time zone
pub fn service_day() -> String {
    service_day_at(&Local::now())
}

/// Result of copying the temporary file to the served location
#[derive(Debug)]
pub enum PublishOutcome {
    /// Published; `backup` is the copy of the previous file, if there was one
    Published { backup: Option<PathBuf> },
    Failed(UpdaterError),
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published { .. })
    }
}

/// Serialize the snapshot as compact JSON into `path`
///
/// Non-ASCII characters are written as-is.
pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<(), UpdaterError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, snapshot)?;
    writer.flush()?;
    Ok(())
}

pub fn backup_path(static_path: &Path) -> PathBuf {
    let mut name = static_path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy `temp_path` over `static_path`, first saving the previous file as `<static_path>.bak`
///
/// A failed backup is logged and publishing continues. A failed copy is
/// returned as [`PublishOutcome::Failed`] for the caller to report.
pub fn publish(temp_path: &Path, static_path: &Path) -> PublishOutcome {
    let mut backup = None;
    if static_path.exists() {
        let bak = backup_path(static_path);
        match fs::copy(static_path, &bak) {
            Ok(_) => backup = Some(bak),
            Err(e) => warn!("Could not back up {}: {}", static_path.display(), e),
        }
    }

    match fs::copy(temp_path, static_path) {
        Ok(_) => {
            info!("Published snapshot to {}", static_path.display());
            PublishOutcome::Published { backup }
        }
        Err(origin) => PublishOutcome::Failed(UpdaterError::PublishError {
            path: static_path.to_path_buf(),
            origin,
        }),
    }
}
