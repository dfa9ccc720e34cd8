use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::fs;

pub fn handle(cmd: &Commands, _cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                println!("{}", content);
            } else {
                warning(format!(
                    "No configuration file at {} (using defaults)",
                    path.display()
                ));
            }
        }

        if *check {
            if !path.exists() {
                warning("No configuration file found; run `shiftlog init` first.");
                return Ok(());
            }
            let content = fs::read_to_string(&path)?;
            let parsed: Config = serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("Invalid configuration: {}", e)))?;

            if parsed.storage != "sqlite" && parsed.storage != "memory" {
                return Err(AppError::Config(format!(
                    "Unknown storage backend '{}'",
                    parsed.storage
                )));
            }
            success("Configuration file is valid.");
        }
    }

    Ok(())
}
