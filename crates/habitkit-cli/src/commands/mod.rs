pub mod backup;
pub mod config;
pub mod habit;
pub mod theme;
pub mod timer;

use std::error::Error;

use habitkit_core::{Config, Database, PersistenceWarning};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Open the SQLite store the configuration points at.
pub fn open_database(config: &Config) -> CliResult<Database> {
    let path = config.database_path()?;
    Ok(Database::open_at(path)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Failed writes do not fail the command; tell the user on stderr.
pub fn report_warnings(warnings: &[PersistenceWarning]) {
    for warning in warnings {
        eprintln!("warning: {} was not saved: {}", warning.operation, warning.error);
    }
}
