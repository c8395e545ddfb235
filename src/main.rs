use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    AuthCommand, ConfigCommand, LogCommand, ProfileCommand, StatusCommand, WelcomeCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "gl")]
#[command(version)]
#[command(about = "Track blood glucose readings", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the introduction
    Welcome(WelcomeCommand),

    /// Log in or out with your phone number
    Auth(AuthCommand),

    /// Create or view your profile
    Profile(ProfileCommand),

    /// Record, list and delete glucose readings
    Log(LogCommand),

    /// Show where to start
    Status(StatusCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("GLUCOLOG_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;
    tracing::debug!("Using API at {}", config.api_url.value);

    match cli.command {
        Some(Commands::Welcome(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Auth(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Profile(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Log(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Status(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
