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

/// Runtime configuration, loaded from `GLOWCART_*` environment variables by
/// [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origin of the commerce backend the catalog is fetched from,
    /// e.g. `"https://shop.example.com"`.
    pub shop_url: String,
    /// Page size for catalog pagination requests.
    pub catalog_page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Delay between catalog page requests, to stay polite to the backend.
    pub inter_request_delay_ms: u64,
    /// How often the server re-fetches the catalog snapshot.
    pub catalog_refresh_secs: u64,
}
