use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceStore;
use crate::errors::AppResult;
use crate::models::event::{CreateRequest, OriginFix};
use crate::models::event_type::EventType;
use crate::store;
use crate::ui::messages::success;
use crate::utils::time::parse_ts;

/// Check a worker in at their assigned venue.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::In {
        worker_id,
        lat,
        lon,
        captured_at,
        comment,
    } = cmd
    {
        // Both coordinates or none; the engine reports LocationRequired
        // with a precise message instead of clap rejecting the call.
        let origin = match (lat, lon) {
            (Some(lat), Some(lon)) => Some(OriginFix {
                latitude: *lat,
                longitude: *lon,
                captured_at: match captured_at {
                    Some(ts) => Some(parse_ts(ts)?),
                    None => None,
                },
            }),
            _ => None,
        };

        let port = store::open_from_config(cfg)?;
        let engine = AttendanceStore::new(port, cfg);

        let ev = engine.create(&CreateRequest {
            worker_id: *worker_id,
            kind: EventType::CheckIn,
            comment: comment.clone(),
            origin,
        })?;

        success(format!(
            "Worker {} checked in at {} (event #{})",
            ev.worker_id,
            ev.recorded_at_str(),
            ev.id
        ));
    }
    Ok(())
}
