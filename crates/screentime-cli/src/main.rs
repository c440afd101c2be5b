use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "screentime-cli", version, about = "Screentime CLI")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Share a task to the achievement feed
    Share {
        /// Task ID
        task_id: String,
        /// Replaces the task description in the feed
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Achievement feed
    Feed {
        #[command(subcommand)]
        action: commands::feed::FeedAction,
    },
    /// Screen-time allowance
    Ledger {
        #[command(subcommand)]
        action: commands::ledger::LedgerAction,
    },
    /// Daily goal progress and weekly streak
    Streak,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Delete all saved tasks, feed, allowance and streak
    Reset,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let out = commands::Output { json: cli.json };
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, out),
        Commands::Share { task_id, comment } => commands::share::run(&task_id, &comment, out),
        Commands::Feed { action } => commands::feed::run(action, out),
        Commands::Ledger { action } => commands::ledger::run(action, out),
        Commands::Streak => commands::streak::run(out),
        Commands::Config { action } => commands::config::run(action, out),
        Commands::Reset => commands::reset(out),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
