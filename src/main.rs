use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::collections::BTreeMap;
use std::path::Path;

use sf_connection::api::{Connection, ConnectionError, ConnectionOptions, Credentials};
use sf_connection::config::Config;

mod cli;

use cli::{Cli, Commands};

/// Exit status when a query is aborted because too many records changed
const MASS_UPDATE_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    info!("Starting sf-connection");

    match run(cli).await {
        Err(e) if is_mass_update(&e) => {
            error!("{:#}", e);
            eprintln!("{:#}", e);
            std::process::exit(MASS_UPDATE_EXIT_CODE);
        }
        result => result,
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(path) = log_file {
        // Truncate on each run
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn is_mass_update(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<ConnectionError>()
        .is_some_and(ConnectionError::is_mass_update)
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let credentials = match &cli.env_file {
        Some(path) => Credentials::from_env_file(path)?,
        None => Credentials::from_env()?,
    };

    let api_version = cli
        .api_version
        .clone()
        .unwrap_or_else(|| config.api_version.clone());
    let options = config.connection_options();

    match cli.command {
        Commands::Recent(object) => {
            let mut connection = connect(credentials, &object.object, &api_version, options).await?;
            let ids = connection
                .query_recent_records()
                .await
                .with_context(|| format!("Failed to query recently modified {} records", object.object))?;

            for id in ids {
                println!("{}", id);
            }
        }
        Commands::Get { object, id } => {
            let mut connection = connect(credentials, &object.object, &api_version, options).await?;
            match connection.query_single_object(&id).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("{} {} not found", object.object, id),
            }
        }
        Commands::Create { object, fields } => {
            let connection = connect(credentials, &object.object, &api_version, options).await?;
            let data: BTreeMap<String, String> = fields.into_iter().collect();
            let success = connection
                .create_record(&data)
                .await
                .with_context(|| format!("Failed to create {} record", object.object))?;
            println!("{}", success);
        }
        Commands::Update { object, id, fields } => {
            let connection = connect(credentials, &object.object, &api_version, options).await?;
            let data: BTreeMap<String, String> = fields.into_iter().collect();
            connection
                .update_record(&id, &data)
                .await
                .with_context(|| format!("Failed to update {} record {}", object.object, id))?;
            println!("updated {}", id);
        }
    }

    Ok(())
}

async fn connect(
    credentials: Credentials,
    object: &str,
    api_version: &str,
    options: ConnectionOptions,
) -> Result<Connection> {
    Connection::with_options(credentials, object, api_version, options)
        .await
        .with_context(|| format!("Failed to connect to {} endpoint", object))
}
