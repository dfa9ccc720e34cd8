use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceStore;
use crate::errors::AppResult;
use crate::models::event::CreateRequest;
use crate::models::event_type::EventType;
use crate::store;
use crate::ui::messages::success;

/// Check a worker out. No geofence: a checkout is always accepted as
/// long as the worker is currently on duty.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Out { worker_id, comment } = cmd {
        let port = store::open_from_config(cfg)?;
        let engine = AttendanceStore::new(port, cfg);

        let ev = engine.create(&CreateRequest {
            worker_id: *worker_id,
            kind: EventType::CheckOut,
            comment: comment.clone(),
            origin: None,
        })?;

        success(format!(
            "Worker {} checked out at {} (event #{})",
            ev.worker_id,
            ev.recorded_at_str(),
            ev.id
        ));
    }
    Ok(())
}
