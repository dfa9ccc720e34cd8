use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::AttendanceStore;
use crate::errors::{AppError, AppResult};
use crate::models::event::{AttendanceEvent, EventFilter};
use crate::models::event_type::EventType;
use crate::store;
use crate::utils::colors::colorize_in_out;
use crate::utils::table::{Column, Table};

/// List recent attendance events, most recent first.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List {
        worker,
        kind,
        limit,
        json,
    } = cmd
    {
        let kind = match kind {
            Some(code) => Some(
                EventType::from_code(code)
                    .ok_or_else(|| AppError::InvalidEventKind(code.clone()))?,
            ),
            None => None,
        };

        let port = store::open_from_config(cfg)?;
        let engine = AttendanceStore::new(port, cfg);

        let events = engine.list(&EventFilter {
            worker_id: *worker,
            kind,
            from: None,
            to: None,
            limit: Some(limit.unwrap_or(20)),
        })?;

        if *json {
            let out = serde_json::to_string_pretty(&events)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        if events.is_empty() {
            println!("No events found.");
            return Ok(());
        }

        print_events(&events);
    }
    Ok(())
}

fn print_events(events: &[AttendanceEvent]) {
    let mut table = Table::new(vec![
        Column::new("ID", 6),
        Column::new("WORKER", 8),
        Column::new("KIND", 5),
        Column::new("RECORDED AT", 17),
        Column::new("ORIGIN", 22),
        Column::new("COMMENT", 24),
    ]);

    for ev in events {
        let origin = ev
            .origin()
            .map(|(lat, lon)| format!("{:.5},{:.5}", lat, lon))
            .unwrap_or_else(|| "—".to_string());

        table.add_row(vec![
            ev.id.to_string(),
            ev.worker_id.to_string(),
            colorize_in_out(ev.kind.as_db_str(), ev.kind.is_check_in()),
            ev.recorded_at_str(),
            origin,
            ev.comment.clone().unwrap_or_default(),
        ]);
    }

    print!("{}", table.render());
}
