use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{upsert_venue, upsert_worker};
use crate::errors::{AppError, AppResult};
use crate::models::{venue::Venue, worker::Worker};
use crate::ui::messages::success;
use serde::Deserialize;
use std::fs;

/// Shape of the backoffice directory export. The backoffice owns this
/// data; sync only mirrors it for joins and geofence lookups.
#[derive(Deserialize)]
struct DirectoryExport {
    #[serde(default)]
    venues: Vec<Venue>,
    #[serde(default)]
    workers: Vec<Worker>,
}

/// Refresh the local worker/venue mirror from a JSON export.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sync { file } = cmd {
        let content = fs::read_to_string(file)?;
        let export: DirectoryExport = serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidDirectory(format!("{}: {}", file, e)))?;

        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        // One transaction for the whole refresh: a half-applied mirror
        // would let check-ins validate against mismatched rows.
        let tx = pool.conn.transaction()?;
        for v in &export.venues {
            upsert_venue(&tx, v)?;
        }
        for w in &export.workers {
            upsert_worker(&tx, w)?;
        }
        tx.commit()?;

        ttlog(
            &pool.conn,
            "sync",
            file,
            &format!(
                "Directory refreshed: {} venues, {} workers",
                export.venues.len(),
                export.workers.len()
            ),
        )
        .ok();

        success(format!(
            "Directory synced: {} venues, {} workers",
            export.venues.len(),
            export.workers.len()
        ));
    }
    Ok(())
}
