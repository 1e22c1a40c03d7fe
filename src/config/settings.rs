use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub explorer: ExplorerSettings,
    pub narrative: NarrativeSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

/// Ledger-query (block explorer) API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Timeout for the load-bearing balance / tx-count calls.
    pub critical_timeout_seconds: u64,
    /// Timeout for the best-effort history / token-transfer calls.
    pub history_timeout_seconds: u64,
}

/// Generative-text backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Hours before a stored analysis goes stale and is recomputed.
    pub freshness_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Wallet Persona".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            explorer: ExplorerSettings {
                base_url: "https://api.etherscan.io/api".to_string(),
                api_key: None,
                critical_timeout_seconds: 10,
                history_timeout_seconds: 15,
            },
            narrative: NarrativeSettings {
                base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
                    .to_string(),
                api_key: None,
                timeout_seconds: 10,
            },
            database: DatabaseSettings {
                url: "sqlite://wallet_persona.db".to_string(),
                max_connections: 10,
            },
            cache: CacheSettings { freshness_hours: 24 },
            api: ApiSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("WALLET_PERSONA").separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.cache.freshness_hours as i64)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache.freshness_hours == 0 {
            return Err("Cache freshness window must be at least one hour".to_string());
        }
        if self.explorer.critical_timeout_seconds == 0 || self.explorer.history_timeout_seconds == 0
        {
            return Err("Explorer timeouts must be non-zero".to_string());
        }
        Ok(())
    }
}

impl ExplorerSettings {
    pub fn critical_timeout(&self) -> Duration {
        Duration::from_secs(self.critical_timeout_seconds)
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_seconds)
    }
}

impl NarrativeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
