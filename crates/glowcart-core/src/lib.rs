pub mod app_config;
pub mod catalog;
pub mod config;
pub mod disclosure;
pub mod fields;
pub mod filter;
pub mod recent;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Collection, Product};
pub use config::{load_app_config, load_app_config_from_env};
pub use disclosure::{Disclosure, GRID_BATCH_SIZE};
pub use fields::{normalize_facet, parse_bool_field, parse_list_field};
pub use filter::{filter_and_sort, CategoryScope, FilterState, SortKey};
pub use recent::{record_recently_viewed, RecentStore, RECENTLY_VIEWED_CAP};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
