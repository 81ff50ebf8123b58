use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use gator::{build_registry, Command, Config, Database, Result, Session, State};

/// A command-line RSS feed aggregator
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "gator.toml")]
    config: PathBuf,

    /// Path to the session file (defaults to ~/.gatorconfig.json)
    #[arg(long)]
    session: Option<PathBuf>,

    /// Command to run: register, login, reset, users, agg, addfeed,
    /// feeds, follow, following or unfollow
    command: Option<String>,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if let Err(e) = gator::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        gator::logging::init_console_only(&config.logging.level);
    }

    let Some(name) = cli.command else {
        eprintln!("Usage: gator [--config <toml>] [--session <json>] <command> [args...]");
        eprintln!("Commands: {}", build_registry().names().join(", "));
        return ExitCode::FAILURE;
    };

    match run(config, cli.session, Command::new(name, cli.args)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, session_path: Option<PathBuf>, cmd: Command) -> Result<()> {
    let session_path = match session_path {
        Some(path) => path,
        None => Session::default_path()?,
    };
    let session = Session::load_or_create(session_path)?;
    debug!("Loaded session from {:?}", session.path());

    let db = Database::open(&session.db_url(), config.database.max_connections).await?;
    info!("gator {} ready", env!("CARGO_PKG_VERSION"));

    let registry = build_registry();
    let mut state = State::new(db, session, config);
    registry.run(&mut state, &cmd).await
}
