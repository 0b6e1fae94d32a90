use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sf-connection")]
#[command(about = "Query and update sObject records through the Salesforce REST API")]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Load credentials from this .env file instead of the process environment
    #[arg(long, global = true)]
    pub env_file: Option<String>,

    /// Override the REST API version from the config file
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List ids of records modified in the last 24 hours
    Recent(ObjectArgs),
    /// Fetch a single record by id
    Get {
        #[command(flatten)]
        object: ObjectArgs,
        id: String,
    },
    /// Create a record
    Create {
        #[command(flatten)]
        object: ObjectArgs,
        /// Field values as KEY=VALUE
        #[arg(long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Update an existing record
    Update {
        #[command(flatten)]
        object: ObjectArgs,
        id: String,
        /// Field values as KEY=VALUE
        #[arg(long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
}

#[derive(Args)]
pub struct ObjectArgs {
    /// sObject endpoint name, e.g. Contact or Lead
    #[arg(long)]
    pub object: String,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
