use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;
use habitkit_core::backup;
use habitkit_core::{Config, SystemClock};

use super::{open_database, print_json, CliResult};

#[derive(Subcommand)]
pub enum BackupAction {
    /// Write every key to a JSON backup
    Export {
        /// File or directory to write to; prints to stdout when omitted.
        /// A directory gets a dated productivity-hub-backup file.
        path: Option<PathBuf>,
    },
    /// Restore a JSON backup; fields missing from it are left alone
    Import { path: PathBuf },
    /// Delete habits, tasks and timer data; the theme is kept
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: BackupAction, config: &Config) -> CliResult {
    let db = open_database(config)?;
    match action {
        BackupAction::Export { path } => {
            let json = backup::export_json(&db, &SystemClock)?;
            match path {
                None => println!("{json}"),
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(backup::export_file_name(Local::now().date_naive()))
                    } else {
                        path
                    };
                    std::fs::write(&path, json)?;
                    eprintln!("exported to {}", path.display());
                }
            }
        }
        BackupAction::Import { path } => {
            let json = std::fs::read_to_string(&path)?;
            let summary = backup::import(&db, &json)?;
            print_json(&summary)?;
        }
        BackupAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear all data without --yes".into());
            }
            backup::clear_all(&db)?;
            println!("all data cleared");
        }
    }
    Ok(())
}
