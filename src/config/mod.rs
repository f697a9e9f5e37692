//! Configuration for the analytics engine and its CLI host.
//!
//! Two sections: `storage` (where the document store lives) and `query`
//! (per-call deadline, default page size). Both sections and every field
//! have defaults, so an empty or missing file is a valid configuration.

mod query;
mod storage;

pub use query::{QueryConfig, DEFAULT_PAGE_SIZE, DEFAULT_QUERY_TIMEOUT_MS};
pub use storage::{MongodbConfig, StorageConfig};

use serde::Deserialize;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "ORDER_INSIGHTS_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ORDER_INSIGHTS";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "ORDER_INSIGHTS_LOG";

/// Root of the YAML document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Query execution settings.
    pub query: QueryConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ::config::ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.storage.mongodb.database, "ecom");
        assert_eq!(config.query.timeout_ms, DEFAULT_QUERY_TIMEOUT_MS);
    }

    #[test]
    #[serial]
    fn test_config_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "storage:\n  mongodb:\n    uri: mongodb://db:27017\n    database: shop\nquery:\n  timeout_ms: 500\n"
        )
        .unwrap();

        let config = Config::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.storage.mongodb.uri, "mongodb://db:27017");
        assert_eq!(config.storage.mongodb.database, "shop");
        assert_eq!(config.query.timeout_ms, 500);
        assert_eq!(config.query.default_page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    #[serial]
    fn test_config_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "storage:\n  mongodb:\n    database: shop\n").unwrap();

        std::env::set_var("ORDER_INSIGHTS__STORAGE__MONGODB__DATABASE", "analytics");
        let result = Config::load(Some(file.path().to_str().unwrap()));
        std::env::remove_var("ORDER_INSIGHTS__STORAGE__MONGODB__DATABASE");

        assert_eq!(result.unwrap().storage.mongodb.database, "analytics");
    }

    #[test]
    #[serial]
    fn test_config_missing_explicit_file_fails() {
        assert!(Config::load(Some("/nonexistent/order-insights.yaml")).is_err());
    }
}
