use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "barrier-cli", version, about = "Barrier Control CLI")]
struct Cli {
    /// Config file to use instead of ~/.config/barrier-control/config.toml
    #[arg(long, global = true, env = "BARRIER_CONTROL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard of a freshly seeded barrier
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Show the seeded activity log
    Log {
        #[arg(long)]
        json: bool,
    },
    /// Open the barrier and wait for the transition to finish
    Open {
        #[arg(long)]
        json: bool,
    },
    /// Close the barrier and wait for the transition to finish
    Close {
        #[arg(long)]
        json: bool,
    },
    /// Run a sequence of open/close requests against one session
    Simulate(commands::simulate::SimulateArgs),
    /// Interactive session reading commands from stdin
    Run,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BARRIER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Status { json } => commands::status::run(config, json),
        Commands::Log { json } => commands::status::run_log(config, json),
        Commands::Open { json } => commands::simulate::run_single(
            config,
            barrier_core::BarrierAction::Open,
            json,
        ),
        Commands::Close { json } => commands::simulate::run_single(
            config,
            barrier_core::BarrierAction::Close,
            json,
        ),
        Commands::Simulate(args) => commands::simulate::run(config, args),
        Commands::Run => commands::session::run(config),
        Commands::Config { action } => commands::config::run(config, action),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "barrier-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
