use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level configuration shared by the server and the CLI.
///
/// Business settings (store address, service radius, provider key) are not
/// here; they live in the settings store so they can change at runtime.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Endpoint of the distance-matrix provider.
    pub distance_api_url: String,
    pub distance_timeout_secs: u64,
    /// Extra attempts after a `ProviderUnavailable` failure. `0` means one attempt.
    pub distance_max_retries: u32,
    pub distance_retry_backoff_ms: u64,
    /// Requests per minute allowed on the provider-backed endpoints.
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("distance_api_url", &self.distance_api_url)
            .field("distance_timeout_secs", &self.distance_timeout_secs)
            .field("distance_max_retries", &self.distance_max_retries)
            .field("distance_retry_backoff_ms", &self.distance_retry_backoff_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
