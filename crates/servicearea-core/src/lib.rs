//! Domain model and pricing engine for distance-banded service pricing.
//!
//! Storage and the distance provider are reached through the traits in
//! [`ports`]; adapters live in `servicearea-db` and `servicearea-distance`.

pub mod app_config;
pub mod config;
pub mod distance;
pub mod memory;
pub mod ports;
pub mod ranges;
pub mod resolver;
pub mod settings;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_DISTANCE_API_URL};
pub use distance::{require_inputs, DistanceError, DistanceResult};
pub use memory::{MemoryRangeStore, MemorySettingsStore};
pub use ports::{DistanceProvider, RangeRepository, SettingsRepository, StoreError};
pub use ranges::{
    find_covering, find_overlap, sort_for_listing, NewPricingRange, PricingRange, RangeError,
};
pub use resolver::{PricingResolver, Quote, ResolveError, ServiceCheck};
pub use settings::{
    Settings, SettingsChange, SettingsError, SettingsPatch, DEFAULT_MAX_SERVICE_RADIUS_KM,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
