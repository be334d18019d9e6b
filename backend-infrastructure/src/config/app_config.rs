use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;

use backend_domain::{DbConfig, RuntimeConfig, StoreKind};

use super::validation::validate_database_name;

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(String),
    /// The file was missing and defaults were used.
    Defaults(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub memory_seed_path: Option<String>,
    pub scheduler_enabled: bool,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8055".to_string(),
            store: "clickhouse".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "prezo".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            memory_seed_path: None,
            scheduler_enabled: true,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
            log_dir: None,
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> String {
        env::var("PREZO_CONFIG").unwrap_or_else(|_| "./config.toml".to_string())
    }

    pub async fn load() -> Result<(Self, ConfigSource)> {
        Self::load_from(&Self::config_path()).await
    }

    /// Reads `path`, or falls back to defaults when it does not exist. The
    /// source is returned so it can be logged once tracing is installed.
    pub async fn load_from(path: &str) -> Result<(Self, ConfigSource)> {
        let file_path = Path::new(path);
        let base_dir = file_path.parent();
        let (mut config, source) = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            (Self::from_toml(&content)?, ConfigSource::File(path.to_string()))
        } else {
            (AppConfig::default(), ConfigSource::Defaults(path.to_string()))
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok((config, source))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| anyhow!("invalid config: {}", err))
    }

    pub fn normalize(&mut self) {
        self.store = self.store.trim().to_lowercase();
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.memory_seed_path = normalize_optional(self.memory_seed_path.take());
        self.log_dir = normalize_optional(self.log_dir.take());
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if let Some(seed) = &self.memory_seed_path {
            self.memory_seed_path = Some(resolve_path(base, seed));
        }
        if let Some(dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        let store = self.store_kind()?;
        if store == StoreKind::Clickhouse {
            if self.clickhouse_url.trim().is_empty() {
                return Err(anyhow!("clickhouse_url must not be empty"));
            }
            validate_database_name(&self.clickhouse_database)?;
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn store_kind(&self) -> Result<StoreKind> {
        StoreKind::parse(&self.store).ok_or_else(|| {
            anyhow!(
                "invalid store '{}', expected 'clickhouse' or 'memory'",
                self.store
            )
        })
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            scheduler_enabled: self.scheduler_enabled,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> Result<DbConfig> {
        Ok(DbConfig {
            store: self.store_kind()?,
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
            memory_seed_path: self.memory_seed_path.clone(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("PREZO_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("PREZO_STORE") {
            self.store = value;
        }
        if let Ok(value) = env::var("PREZO_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("PREZO_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("PREZO_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("PREZO_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("PREZO_MEMORY_SEED_PATH") {
            self.memory_seed_path = Some(value);
        }
        if let Ok(value) = env::var("PREZO_SCHEDULER_ENABLED") {
            self.scheduler_enabled = value.parse().unwrap_or(self.scheduler_enabled);
        }
        if let Ok(value) = env::var("PREZO_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("PREZO_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("PREZO_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("PREZO_LOG_JSON") {
            self.log_json = value.parse().unwrap_or(self.log_json);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_path(base: &Path, value: &str) -> String {
    let path = Path::new(value);
    if path.is_absolute() {
        value.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.store_kind().expect("store"), StoreKind::Clickhouse);
        assert!(config.to_runtime_config().scheduler_enabled);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut config = AppConfig::from_toml(
            r#"
store = " Memory "
memory_seed_path = "  "
scheduler_enabled = false
"#,
        )
        .expect("parse");
        config.normalize();
        config.validate().expect("validate");
        assert_eq!(config.store_kind().expect("store"), StoreKind::Memory);
        assert_eq!(config.memory_seed_path, None);
        assert_eq!(config.bind_addr, "127.0.0.1:8055");
        assert!(!config.scheduler_enabled);
    }

    #[test]
    fn rejects_unknown_store_and_bad_database() {
        let mut config = AppConfig::default();
        config.store = "postgres".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.clickhouse_database = "prezo; DROP".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.store = "memory".to_string();
        config.clickhouse_database = "prezo; DROP".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config = AppConfig {
            memory_seed_path: Some("seed.json".to_string()),
            log_dir: Some("/var/log/prezo".to_string()),
            ..AppConfig::default()
        };
        config.resolve_paths(Some(Path::new("/etc/prezo")));
        assert_eq!(config.memory_seed_path.as_deref(), Some("/etc/prezo/seed.json"));
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/prezo"));
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_defaults() {
        let path = std::env::temp_dir().join(format!("prezo-missing-{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let (config, source) = AppConfig::load_from(&path).await.expect("load");
        assert_eq!(source, ConfigSource::Defaults(path));
        assert!(config.max_body_bytes > 0);
    }

    #[tokio::test]
    async fn existing_file_is_reported_as_its_path() {
        let path = std::env::temp_dir().join(format!("prezo-config-{}.toml", std::process::id()));
        fs::write(&path, "store = \"memory\"\n").await.expect("write");
        let path = path.to_string_lossy().to_string();
        let (config, source) = AppConfig::load_from(&path).await.expect("load");
        let _ = fs::remove_file(&path).await;
        assert_eq!(source, ConfigSource::File(path));
        assert_eq!(config.store, "memory");
    }
}
