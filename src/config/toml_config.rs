use crate::adapters::reply::CachePolicy;
use crate::config::{validate_provider, RawStoreSettings, DEFAULT_BIND_ADDRESS, DEFAULT_SIGNUPS_TABLE, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::utils::error::{CounterError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub cache_max_age_secs: Option<u64>,
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CounterError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| CounterError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未解析的 ${VAR} 視為未設定
        config.store.url = config.store.url.filter(|v| !is_placeholder(v));
        config.store.api_key = config.store.api_key.filter(|v| !is_placeholder(v));

        Ok(config)
    }

    /// 替換環境變數 (例如 ${SUPABASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CounterError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn allowed_origins(&self) -> &[String] {
        self.server.allowed_origins.as_deref().unwrap_or(&[])
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }
}

fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("${") && value.ends_with('}')
}

impl RawStoreSettings for TomlConfig {
    fn supabase_url_opt(&self) -> &Option<String> {
        &self.store.url
    }

    fn supabase_key_opt(&self) -> &Option<String> {
        &self.store.api_key
    }

    fn signups_table_name(&self) -> &str {
        self.signups_table()
    }

    fn timeout_secs(&self) -> u64 {
        self.request_timeout_secs()
    }

    fn cache_secs(&self) -> u64 {
        self.cache_max_age_secs()
    }
}

impl ConfigProvider for TomlConfig {
    fn supabase_url(&self) -> &str {
        self.store.url.as_deref().unwrap_or_default()
    }

    fn supabase_key(&self) -> &str {
        self.store.api_key.as_deref().unwrap_or_default()
    }

    fn signups_table(&self) -> &str {
        self.store.table.as_deref().unwrap_or(DEFAULT_SIGNUPS_TABLE)
    }

    fn request_timeout_secs(&self) -> u64 {
        self.store.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    fn cache_max_age_secs(&self) -> u64 {
        self.server
            .cache_max_age_secs
            .unwrap_or(CachePolicy::DEFAULT_MAX_AGE_SECS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        crate::utils::validation::validate_socket_addr("server.bind_address", self.bind_address())?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level()) {
            return Err(CounterError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.log_level().to_string(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }
}
