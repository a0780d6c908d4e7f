use clap::{Parser, Subcommand};
use standards_core::Config;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "standards-cli", version, about = "Standards period & progress CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the period window containing an instant
    Window(commands::window::WindowArgs),
    /// Derive Met / In Progress / Missed for a period total
    Status(commands::status::StatusArgs),
    /// Build the progress map for standards and logs in an input file
    Progress(commands::progress::ProgressArgs),
    /// Follow period boundaries in real time, printing progress at each one
    Watch(commands::watch::WatchArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_tracing(&config.logging.filter);
    if let Some(e) = load_error {
        warn!("using default configuration: {e}");
    }

    let result = match cli.command {
        Commands::Window(args) => commands::window::run(args, &config),
        Commands::Status(args) => commands::status::run(args),
        Commands::Progress(args) => commands::progress::run(args, &config),
        Commands::Watch(args) => commands::watch::run(args, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
