use clap::{CommandFactory, Parser, Subcommand};
use habitkit_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habitkit", version, about = "HabitKit CLI: habits and pomodoro timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit tracking
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Export, import or wipe all data
    Backup {
        #[command(subcommand)]
        action: commands::backup::BackupAction,
    },
    /// Colour theme preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    // The subscriber needs a config, so a load failure is reported once
    // tracing runs on the defaults.
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&config);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "falling back to default configuration");
    }

    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action, &config),
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Backup { action } => commands::backup::run(action, &config),
        Commands::Theme { action } => commands::theme::run(action, &config),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habitkit", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
