use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "timepilot-cli", version, about = "TimePilot CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out events from a JSON file
    Layout(commands::layout::LayoutArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Account and session management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Habitual and ad-hoc event management
    Events {
        #[command(subcommand)]
        action: commands::events::EventsAction,
    },
    /// Generate a smart daily plan
    Plan(commands::plan::PlanArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Layout(args) => commands::layout::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Events { action } => commands::events::run(action),
        Commands::Plan(args) => commands::plan::run(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
