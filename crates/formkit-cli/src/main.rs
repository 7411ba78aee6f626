//! FormKit CLI
//!
//! Command-line interface for the FormKit form builder.
//!
//! # Usage
//!
//! ```bash
//! formkit fields add --file contact.json --type email --required
//! formkit fields reorder --file contact.json field_a field_b
//! formkit forms create --file contact.json
//! formkit versions create <form-id> --file contact.json
//! formkit versions restore <form-id> 1
//! formkit versions list <form-id> --format json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formkit_core::FieldType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "formkit")]
#[command(version)]
#[command(about = "FormKit Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "FORMKIT_API_URL")]
    api_url: Option<String>,

    /// API key for authentication
    #[arg(long, env = "FORMKIT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage forms on the server
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Browse and manage a form's version history
    Versions {
        #[command(subcommand)]
        action: VersionCommands,
    },
    /// Edit the fields of a local schema file
    Fields {
        #[command(subcommand)]
        action: FieldCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// List all forms
    List,
    /// Get form details
    Get { id: String },
    /// Create a form from a schema file
    Create {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Replace a form's live schema
    Save {
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Snapshot and publish a form
    Publish { id: String },
    /// Delete a form and its history
    Delete { id: String },
}

#[derive(Subcommand)]
enum VersionCommands {
    /// List versions, newest first
    List { form_id: String },
    /// Show one version
    Get { form_id: String, version: u32 },
    /// Snapshot a schema file as a new version
    Create {
        form_id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Append a copy of an old version as the newest one
    Restore { form_id: String, version: u32 },
    /// Delete a version (the active one is refused)
    Delete { form_id: String, version: u32 },
}

#[derive(Subcommand)]
enum FieldCommands {
    /// Show the fields of a schema file
    Show {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Append a field; creates the file when missing
    Add {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long = "type", short = 't')]
        field_type: FieldType,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        required: bool,
        /// Comma separated choices for select/radio/checkbox
        #[arg(long, value_delimiter = ',')]
        choices: Vec<String>,
    },
    /// Update a field
    Update {
        #[arg(short, long)]
        file: PathBuf,
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, conflicts_with = "clear_placeholder")]
        placeholder: Option<String>,
        #[arg(long)]
        clear_placeholder: bool,
        #[arg(long)]
        required: Option<bool>,
        #[arg(long = "type", short = 't')]
        field_type: Option<FieldType>,
        #[arg(long, value_delimiter = ',')]
        choices: Option<Vec<String>>,
    },
    /// Remove a field
    Remove {
        #[arg(short, long)]
        file: PathBuf,
        id: String,
    },
    /// Move a field to the slot of another
    Reorder {
        #[arg(short, long)]
        file: PathBuf,
        source: String,
        target: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let profile = cli.profile.as_deref();
    let config = config::Config::load(profile)?;
    let format = match cli.format {
        Some(format) => format,
        None => commands::parse_format(config.format.as_deref())?,
    };

    match cli.command {
        Commands::Fields { action } => commands::fields::handle(action, format),
        Commands::Config { action } => commands::config::handle(action, profile),
        Commands::Forms { action } => {
            let client = commands::connect(cli.api_url, cli.api_key, &config)?;
            commands::forms::handle(action, &client, format).await
        }
        Commands::Versions { action } => {
            let client = commands::connect(cli.api_url, cli.api_key, &config)?;
            commands::versions::handle(action, client, format).await
        }
    }
}
