//! Database settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Errors raised when settings cannot form a usable pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("database url is not configured; set FULFILLMENT_DB_URL")]
    MissingUrl,
    /// A pool of zero connections was requested.
    #[error("max_connections must be at least 1")]
    ZeroMaxConnections,
    /// More idle connections than the pool may hold were requested.
    #[error("min_idle ({min_idle}) exceeds max_connections ({max_connections})")]
    IdleExceedsMax { min_idle: u32, max_connections: u32 },
}

/// Connection settings for the fulfillment address store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FULFILLMENT_DB")]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
    /// Idle connections kept warm.
    #[ortho_config(default = 2)]
    pub min_idle: u32,
    /// Checkout timeout in seconds.
    #[ortho_config(default = 30)]
    pub connection_timeout_secs: u64,
}

impl DatabaseSettings {
    /// Return the configured URL or [`SettingsError::MissingUrl`].
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingUrl)
    }

    /// Build the pool configuration described by these settings.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self.database_url()?;
        if self.max_connections == 0 {
            return Err(SettingsError::ZeroMaxConnections);
        }
        if self.min_idle > self.max_connections {
            return Err(SettingsError::IdleExceedsMax {
                min_idle: self.min_idle,
                max_connections: self.max_connections,
            });
        }
        Ok(PoolConfig::new(url)
            .with_max_size(self.max_connections)
            .with_min_idle(Some(self.min_idle))
            .with_connection_timeout(Duration::from_secs(self.connection_timeout_secs)))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for database settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "FULFILLMENT_DB_URL",
        "FULFILLMENT_DB_MAX_CONNECTIONS",
        "FULFILLMENT_DB_MIN_IDLE",
        "FULFILLMENT_DB_CONNECTION_TIMEOUT_SECS",
    ];

    fn load_from_empty_args() -> DatabaseSettings {
        DatabaseSettings::load_from_iter([OsString::from("fulfillment")])
            .expect("config should load")
    }

    fn settings(url: Option<&str>, max_connections: u32, min_idle: u32) -> DatabaseSettings {
        DatabaseSettings {
            url: url.map(str::to_owned),
            max_connections,
            min_idle,
            connection_timeout_secs: 30,
        }
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(settings.url.is_none());
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_idle, 2);
        assert_eq!(settings.connection_timeout_secs, 30);
        assert_eq!(settings.pool_config().err(), Some(SettingsError::MissingUrl));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "FULFILLMENT_DB_URL",
                Some("postgres://localhost/fulfillment".to_owned()),
            ),
            ("FULFILLMENT_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("FULFILLMENT_DB_MIN_IDLE", Some("1".to_owned())),
            ("FULFILLMENT_DB_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.min_idle, 1);
        assert_eq!(settings.connection_timeout_secs, 5);
        let config = settings.pool_config().expect("valid settings");
        assert_eq!(config.database_url(), "postgres://localhost/fulfillment");
        assert_eq!(config.max_size(), 4);
        assert_eq!(config.min_idle(), Some(1));
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    #[case(settings(Some("  "), 10, 2), SettingsError::MissingUrl)]
    #[case(settings(Some("postgres://db"), 0, 0), SettingsError::ZeroMaxConnections)]
    #[case(
        settings(Some("postgres://db"), 2, 3),
        SettingsError::IdleExceedsMax { min_idle: 3, max_connections: 2 }
    )]
    fn invalid_settings_are_rejected(
        #[case] settings: DatabaseSettings,
        #[case] expected: SettingsError,
    ) {
        assert_eq!(settings.pool_config().err(), Some(expected));
    }
}
