use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CliContext;

#[derive(Parser)]
#[command(name = "questline-cli", version, about = "Questline CLI")]
struct Cli {
    /// Path to the engine database
    #[arg(long, global = true, default_value = "questline.db")]
    db: PathBuf,
    /// Path to an engine config TOML (defaults are used when absent)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// User whose profile the command acts on
    #[arg(long, global = true, default_value = "1")]
    user: i64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Player profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Task completion
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Focus session completion
    Focus {
        #[command(subcommand)]
        action: commands::focus::FocusAction,
    },
    /// Daily streak rewards
    Claim {
        #[command(subcommand)]
        action: commands::claim::ClaimAction,
    },
    /// Challenges and their progress
    Challenges {
        #[command(subcommand)]
        action: commands::challenges::ChallengeAction,
    },
    /// Virtual garden
    Garden {
        #[command(subcommand)]
        action: commands::garden::GardenAction,
    },
    /// Surprise tasks
    Surprise {
        #[command(subcommand)]
        action: commands::surprise::SurpriseAction,
    },
    /// Reward history ledger
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext {
        db_path: cli.db,
        config_path: cli.config,
        user_id: cli.user,
    };

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action, &ctx),
        Commands::Task { action } => commands::task::run(action, &ctx),
        Commands::Focus { action } => commands::focus::run(action, &ctx),
        Commands::Claim { action } => commands::claim::run(action, &ctx),
        Commands::Challenges { action } => commands::challenges::run(action, &ctx),
        Commands::Garden { action } => commands::garden::run(action, &ctx),
        Commands::Surprise { action } => commands::surprise::run(action, &ctx),
        Commands::History { action } => commands::history::run(action, &ctx),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
