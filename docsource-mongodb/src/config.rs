//! Connection settings for the MongoDB backend.
//!
//! Sources, highest priority last:
//! 1. Built-in defaults
//! 2. Environment variables prefixed with `DOCSOURCE_MONGODB_`
//!
//! `DOCSOURCE_MONGODB_URI` maps to `uri`, `DOCSOURCE_MONGODB_APP_NAME` to
//! `app_name`, and so on.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::MongoDbStoreError;

fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_app_name() -> String {
    "docsource".to_string()
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_server_selection_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MongoDbConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    #[serde(default = "default_uri")]
    pub uri: String,

    /// Application name reported to the server.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_server_selection_timeout_secs")]
    pub server_selection_timeout_secs: u64,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            app_name: default_app_name(),
            connect_timeout_secs: default_connect_timeout_secs(),
            server_selection_timeout_secs: default_server_selection_timeout_secs(),
        }
    }
}

impl MongoDbConfig {
    pub const ENV_PREFIX: &'static str = "DOCSOURCE_MONGODB_";

    /// Loads defaults overlaid with environment variables.
    pub fn load() -> Result<Self, MongoDbStoreError> {
        Ok(Self::figment().extract()?)
    }

    /// The layered figment backing [`MongoDbConfig::load`].
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_without_environment() {
        Jail::expect_with(|_jail| {
            let config = MongoDbConfig::load().expect("config loads");

            assert_eq!(config, MongoDbConfig::default());
            assert_eq!(config.uri, "mongodb://localhost:27017");
            assert_eq!(config.connect_timeout(), Duration::from_secs(10));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCSOURCE_MONGODB_URI", "mongodb://db.internal:27018");
            jail.set_env("DOCSOURCE_MONGODB_APP_NAME", "todo-api");
            jail.set_env("DOCSOURCE_MONGODB_SERVER_SELECTION_TIMEOUT_SECS", "5");

            let config = MongoDbConfig::load().expect("config loads");

            assert_eq!(config.uri, "mongodb://db.internal:27018");
            assert_eq!(config.app_name, "todo-api");
            assert_eq!(config.server_selection_timeout(), Duration::from_secs(5));
            assert_eq!(config.connect_timeout_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("DOCSOURCE_MONGODB_CONNECT_TIMEOUT_SECS", "soon");

            assert!(matches!(MongoDbConfig::load(), Err(MongoDbStoreError::Config(_))));
            Ok(())
        });
    }
}
