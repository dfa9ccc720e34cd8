use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, RESET};

/// Print database information for `db --info`.
pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    let conn = &pool.conn;

    let version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let workers: i64 = conn.query_row("SELECT COUNT(*) FROM workers", [], |row| row.get(0))?;
    let venues: i64 = conn.query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))?;
    let events: i64 = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
    let log_rows: i64 = conn.query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;

    let size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    println!("{}Database info{}", CYAN, RESET);
    println!("  Path           : {}", db_path);
    println!("  Schema version : {}", version);
    println!("  Size           : {} bytes", size);
    println!("  Workers        : {}", workers);
    println!("  Venues         : {}", venues);
    println!("  Events         : {}", events);
    println!("  Log rows       : {}", log_rows);

    Ok(())
}
