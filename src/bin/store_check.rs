//! Connectivity checks for the catch store.
//!
//! Runs outside the service process: `ping` and `insert-sample` go through the
//! REST endpoint, `database` connects straight to Postgres.

use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use catchlog_backend::config::StoreConfig;
use catchlog_backend::db::{CatchStore, Repository};
use catchlog_backend::models::CatchInput;

#[derive(Parser, Debug)]
#[command(author, version, about = "Connectivity checks for the catch store", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch at most one row through the REST endpoint
    Ping,
    /// Insert a sample catch and print the stored row
    InsertSample,
    /// Connect directly to the Postgres database and run `SELECT 1`
    Database {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing so DATABASE_URL can come from .env
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Ping => {
            let repo = repository()?;
            repo.probe().await?;
            println!("Store reachable at {}", repo.table_url());
        }
        Command::InsertSample => {
            let repo = repository()?;
            let record = sample_catch().into_new_record(Local::now().naive_local())?;
            let rows = repo.insert(&record).await?;
            println!("Inserted sample catch:");
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::Database { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&database_url)
                .await?;
            let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
            pool.close().await;
            println!("Database connection successful (SELECT 1 returned {})", one);
        }
    }
    Ok(())
}

fn repository() -> Result<Repository, Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    Ok(Repository::new(&config)?)
}

fn sample_catch() -> CatchInput {
    CatchInput {
        date: None,
        time: None,
        location: "Loch Raven".to_string(),
        species: "Bluegill".to_string(),
        length_in: 4.75,
        weight_lbs: 1.02,
        weather: Some("sunny".to_string()),
        bait: "worm".to_string(),
    }
}
