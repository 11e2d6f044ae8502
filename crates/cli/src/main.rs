//! Live rates CLI - migrations, settings management and signing tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the settings and session tables
//! lsr-cli migrate
//!
//! # Inspect or update the rate service settings
//! lsr-cli settings show
//! lsr-cli settings set --url https://rates.example.com/quote --secret <secret>
//!
//! # Remove all stored settings
//! lsr-cli uninstall
//!
//! # Compute the signature header for a request body
//! lsr-cli sign --secret <secret> --file request.json
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lsr-cli")]
#[command(author, version, about = "Live shipping rates CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage rate service settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Delete all stored settings
    Uninstall,
    /// Print the signature header for a request body
    Sign {
        /// Shared signing secret
        #[arg(short, long)]
        secret: String,

        /// File to sign (defaults to stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored URL and a masked secret
    Show,
    /// Store the rate service URL and secret
    Set {
        /// Rate service URL
        #[arg(short, long)]
        url: String,

        /// Shared signing secret
        #[arg(short, long)]
        secret: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show().await?,
            SettingsAction::Set { url, secret } => {
                commands::settings::set(&url, &secret).await?;
            }
        },
        Commands::Uninstall => commands::settings::uninstall().await?,
        Commands::Sign { secret, file } => commands::sign::run(&secret, file.as_deref())?,
    }
    Ok(())
}
