//! `settings` command handlers.

use clap::Subcommand;
use rust_decimal::Decimal;
use servicearea_core::{Settings, SettingsPatch, SettingsRepository};

/// Sub-commands available under `settings`.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show the current settings (the API key is never printed)
    Show,
    /// Change one or more settings
    Set {
        /// Origin address for service-area checks
        #[arg(long)]
        store_address: Option<String>,
        /// Largest distance (km) inside the service area
        #[arg(long)]
        max_service_radius: Option<Decimal>,
        /// Distance provider API key
        #[arg(long, env = "SERVICEAREA_DISTANCE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

/// # Errors
///
/// Returns an error if validation fails or the store cannot be reached.
pub(crate) async fn run_settings(
    store: &dyn SettingsRepository,
    command: SettingsCommands,
) -> anyhow::Result<()> {
    match command {
        SettingsCommands::Show => {
            let settings = store.get_settings().await?;
            print_settings(&settings);
        }
        SettingsCommands::Set {
            store_address,
            max_service_radius,
            api_key,
        } => {
            let change = store
                .patch_settings(&SettingsPatch {
                    store_address,
                    max_service_radius,
                    api_key,
                })
                .await?;
            if change.changed {
                println!("settings updated");
            } else {
                println!("settings unchanged");
            }
            print_settings(&change.settings);
        }
    }
    Ok(())
}

fn print_settings(settings: &Settings) {
    let address = if settings.store_address.is_empty() {
        "(not set)"
    } else {
        settings.store_address.as_str()
    };
    println!("store address:      {address}");
    println!("max service radius: {} km", settings.max_service_radius);
    println!(
        "api key:            {}",
        if settings.has_api_key() {
            "configured"
        } else {
            "not set"
        }
    );
}
