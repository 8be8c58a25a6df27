use clap::Subcommand;
use habitkit_core::{Config, Theme};

use super::{open_database, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Get,
    /// Change the theme (dark, light or catppuccin)
    Set { theme: Theme },
    /// List available themes
    List,
}

pub fn run(action: ThemeAction, config: &Config) -> CliResult {
    match action {
        ThemeAction::Get => {
            let db = open_database(config)?;
            println!("{}", Theme::load(&db));
        }
        ThemeAction::Set { theme } => {
            let db = open_database(config)?;
            theme.save(&db)?;
            println!("{theme}");
        }
        ThemeAction::List => {
            for theme in Theme::ALL {
                println!("{theme}");
            }
        }
    }
    Ok(())
}
