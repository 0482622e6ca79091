mod pricing;
mod ranges;
mod settings;

use std::sync::Arc;

use clap::{ArgGroup, Parser, Subcommand};
use rust_decimal::Decimal;
use servicearea_core::{AppConfig, PricingResolver};
use servicearea_db::{PgRangeStore, PgSettingsStore};
use servicearea_distance::DistanceMatrixClient;
use tracing_subscriber::EnvFilter;

use crate::ranges::RangesCommands;
use crate::settings::SettingsCommands;

#[derive(Debug, Parser)]
#[command(name = "servicearea-cli")]
#[command(about = "Distance-based delivery pricing command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Manage pricing ranges
    Ranges {
        #[command(subcommand)]
        command: RangesCommands,
    },
    /// Resolve the price for a distance or an address pair
    #[command(group(ArgGroup::new("input").required(true).args(["distance", "origin"])))]
    Price {
        /// Distance in kilometers
        #[arg(long, conflicts_with_all = ["origin", "destination"])]
        distance: Option<Decimal>,
        /// Origin address
        #[arg(long, requires = "destination")]
        origin: Option<String>,
        /// Destination address
        #[arg(long, requires = "origin")]
        destination: Option<String>,
    },
    /// Check a customer address against the store's service area
    Check {
        /// Customer address
        #[arg(long)]
        destination: String,
    },
    /// Show or change business settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database connection
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("servicearea-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = servicearea_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = servicearea_db::PoolConfig::from_app_config(&config);
    let pool = servicearea_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            servicearea_db::ping(&pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = servicearea_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Ranges { command } => {
            ranges::run_ranges(&PgRangeStore::new(pool), command).await?;
        }
        Commands::Price {
            distance,
            origin,
            destination,
        } => {
            let settings_store = PgSettingsStore::new(pool.clone());
            let resolver = build_resolver(&config, pool)?;
            pricing::run_price(&resolver, &settings_store, distance, origin, destination).await?;
        }
        Commands::Check { destination } => {
            let resolver = build_resolver(&config, pool)?;
            pricing::run_check(&resolver, &destination).await?;
        }
        Commands::Settings { command } => {
            settings::run_settings(&PgSettingsStore::new(pool), command).await?;
        }
    }

    Ok(())
}

fn build_resolver(config: &AppConfig, pool: sqlx::PgPool) -> anyhow::Result<PricingResolver> {
    let distance = DistanceMatrixClient::from_app_config(config)?;
    Ok(PricingResolver::new(
        Arc::new(PgRangeStore::new(pool.clone())),
        Arc::new(distance),
        Arc::new(PgSettingsStore::new(pool)),
    ))
}

#[cfg(test)]
mod tests;
