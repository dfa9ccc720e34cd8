use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::status::LiveStatusAggregator;
use crate::errors::{AppError, AppResult};
use crate::models::status::WorkerStatus;
use crate::store;
use crate::utils::colors::colorize_state;
use crate::utils::table::{Column, Table};
use crate::utils::time::format_duration;
use chrono::Utc;

/// Render the live duty snapshot.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { stale_after, json } = cmd {
        let port = store::open_from_config(cfg)?;
        let aggregator = match stale_after {
            Some(hours) => LiveStatusAggregator::with_stale_after(port, *hours),
            None => LiveStatusAggregator::new(port, cfg),
        };

        let snapshot = aggregator.snapshot()?;

        if *json {
            let out = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{}", out);
            return Ok(());
        }

        if snapshot.is_empty() {
            println!("No active workers in the directory. Run `shiftlog sync` first.");
            return Ok(());
        }

        print_snapshot(&snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &[WorkerStatus]) {
    let now = Utc::now();

    let mut table = Table::new(vec![
        Column::new("WORKER", 22),
        Column::new("VENUE", 22),
        Column::new("STATUS", 16),
        Column::new("SINCE", 17),
        Column::new("FOR", 8),
    ]);

    for st in snapshot {
        let venue = st
            .venue
            .as_ref()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| "—".to_string());
        let since = st
            .since
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "—".to_string());
        let held_for = st
            .since
            .map(|t| format_duration(now - t))
            .unwrap_or_else(|| "—".to_string());

        table.add_row(vec![
            format!("{} (#{})", st.worker.name, st.worker.id),
            venue,
            colorize_state(st.state),
            since,
            held_for,
        ]);
    }

    print!("{}", table.render());
}
