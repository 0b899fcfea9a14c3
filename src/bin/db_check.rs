//! Connection check: connect with the configured credentials and list what the server reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bancarizacion::config::{AppConfig, DEFAULT_CONFIG_FILE};
use bancarizacion::gateway::MySqlConnector;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "db_check", about = "Check the MySQL connection used by the reports")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let db = &config.db;

    println!(
        "connecting to database '{}' on {}:{} as '{}'",
        db.database, db.host, db.port, db.user
    );
    let mut session = MySqlConnector::new(db.clone())
        .open()
        .context("connecting to MySQL")?;

    let (major, minor, patch) = session.server_version();
    println!("server version {major}.{minor}.{patch}");

    let current = session.current_database()?;
    println!("current database: {}", current.as_deref().unwrap_or("(none)"));

    let tables = session.tables()?;
    println!("\ntables:");
    if tables.is_empty() {
        println!("  (none)");
    }
    for table in &tables {
        println!("  - {table}");
    }
    Ok(())
}
