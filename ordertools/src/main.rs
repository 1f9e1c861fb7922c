use clap::{Parser, Subcommand, ValueEnum};
use log::*;

mod formatting;
mod orders;

use order_engine::{config::OrdersConfig, SqliteDatabase};
use postgrest_tools::{PostgrestApi, PostgrestConfig};

use crate::orders::{run_orders_command, OrdersCommand};

#[derive(Parser, Debug)]
#[command(version = "0.1.0", about = "Inspect and manage restaurant orders")]
pub struct Arguments {
    /// Where orders are stored
    #[arg(short, long, value_enum, default_value = "sqlite")]
    backend: Backend,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    /// A local SQLite database (ORD_DATABASE_URL)
    Sqlite,
    /// A hosted PostgREST endpoint (ORD_POSTGREST_URL, ORD_POSTGREST_API_KEY)
    Postgrest,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(subcommand)]
    /// List, create or update orders
    Orders(OrdersCommand),
    /// Create the SQLite database if needed and apply any outstanding migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    let config = OrdersConfig::from_env_or_default();
    let result = match cli.command {
        Command::Migrate => migrate(&config).await,
        Command::Orders(command) => match cli.backend {
            Backend::Sqlite => match connect_sqlite(&config).await {
                Ok(db) => run_orders_command(db, &config, command).await,
                Err(e) => Err(e),
            },
            Backend::Postgrest => match PostgrestApi::new(PostgrestConfig::new_from_env_or_default()) {
                Ok(api) => run_orders_command(api, &config, command).await,
                Err(e) => Err(e.into()),
            },
        },
    };
    if let Err(e) = result {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn connect_sqlite(config: &OrdersConfig) -> anyhow::Result<SqliteDatabase> {
    if config.auto_migrate {
        SqliteDatabase::create_if_missing(&config.database_url).await?;
    }
    debug!("Connecting to {}", config.database_url);
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections).await?;
    if config.auto_migrate {
        db.migrate().await?;
    }
    Ok(db)
}

async fn migrate(config: &OrdersConfig) -> anyhow::Result<()> {
    if SqliteDatabase::create_if_missing(&config.database_url).await? {
        println!("Created database at {}", config.database_url);
    }
    let mut db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections).await?;
    db.migrate().await?;
    db.close().await?;
    println!("Migrations complete");
    Ok(())
}
