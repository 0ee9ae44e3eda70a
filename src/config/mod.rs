pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_SIGNUPS_TABLE: &str = "email_signups";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// 各種設定來源共用的驗證規則
pub(crate) fn validate_provider<C: RawStoreSettings + ?Sized>(config: &C) -> crate::utils::error::Result<()> {
    use crate::utils::validation::*;

    let url = validate_required_field("supabase_url", config.supabase_url_opt())?;
    validate_url("supabase_url", url)?;

    let key = validate_required_field("supabase_key", config.supabase_key_opt())?;
    validate_non_empty_string("supabase_key", key)?;

    validate_identifier("signups_table", config.signups_table_name())?;
    validate_range("request_timeout_secs", config.timeout_secs(), 1, 120)?;
    validate_range("cache_max_age_secs", config.cache_secs(), 0, 86_400)?;

    Ok(())
}

/// Raw view over a configuration source, before required fields are known to be present.
pub(crate) trait RawStoreSettings {
    fn supabase_url_opt(&self) -> &Option<String>;
    fn supabase_key_opt(&self) -> &Option<String>;
    fn signups_table_name(&self) -> &str;
    fn timeout_secs(&self) -> u64;
    fn cache_secs(&self) -> u64;
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "signup-counter")]
#[command(about = "Early-bird subscriber counter API")]
pub struct CliConfig {
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    #[arg(long, env = "SIGNUPS_TABLE", default_value = DEFAULT_SIGNUPS_TABLE)]
    pub signups_table: String,

    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "CACHE_MAX_AGE_SECS", default_value_t = crate::adapters::reply::CachePolicy::DEFAULT_MAX_AGE_SECS)]
    pub cache_max_age_secs: u64,

    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loggable view of the settings, without the key.
    pub fn summary(&self) -> String {
        format!(
            "bind={} url={} table={} timeout={}s cache={}s origins={:?}",
            self.bind_address,
            self.supabase_url.as_deref().unwrap_or("<unset>"),
            self.signups_table,
            self.request_timeout_secs,
            self.cache_max_age_secs,
            self.allowed_origins
        )
    }
}

#[cfg(feature = "cli")]
impl RawStoreSettings for CliConfig {
    fn supabase_url_opt(&self) -> &Option<String> {
        &self.supabase_url
    }

    fn supabase_key_opt(&self) -> &Option<String> {
        &self.supabase_key
    }

    fn signups_table_name(&self) -> &str {
        &self.signups_table
    }

    fn timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    fn cache_secs(&self) -> u64 {
        self.cache_max_age_secs
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn supabase_url(&self) -> &str {
        self.supabase_url.as_deref().unwrap_or_default()
    }

    fn supabase_key(&self) -> &str {
        self.supabase_key.as_deref().unwrap_or_default()
    }

    fn signups_table(&self) -> &str {
        &self.signups_table
    }

    fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
    }

    fn cache_max_age_secs(&self) -> u64 {
        self.cache_max_age_secs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        crate::utils::validation::validate_socket_addr("bind_address", &self.bind_address)?;

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}
