use crate::adapters::reply::CachePolicy;
use crate::config::{validate_provider, RawStoreSettings, DEFAULT_SIGNUPS_TABLE, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::utils::error::{CounterError, Result};
use crate::utils::validation::Validate;
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub signups_table: String,
    pub request_timeout_secs: u64,
    pub cache_max_age_secs: u64,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let config = Self {
            supabase_url: lookup("SUPABASE_URL"),
            supabase_key: lookup("SUPABASE_SERVICE_ROLE_KEY"),
            signups_table: lookup("SIGNUPS_TABLE")
                .unwrap_or_else(|| DEFAULT_SIGNUPS_TABLE.to_string()),
            request_timeout_secs: parse_number(&lookup, "STORE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            cache_max_age_secs: parse_number(
                &lookup,
                "CACHE_MAX_AGE_SECS",
                CachePolicy::DEFAULT_MAX_AGE_SECS,
            )?,
        };

        Ok(config)
    }
}

fn parse_number<F: Fn(&str) -> Option<String>>(lookup: &F, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CounterError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: "Expected a non-negative integer".to_string(),
            }),
    }
}

impl RawStoreSettings for LambdaConfig {
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

impl ConfigProvider for LambdaConfig {
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

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_with_defaults() {
        let config = LambdaConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
        ]))
        .unwrap();

        assert_eq!(config.signups_table(), "email_signups");
        assert_eq!(config.request_timeout_secs(), 10);
        assert_eq!(config.cache_max_age_secs(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_url_fails_validation() {
        let config = LambdaConfig::from_lookup(lookup_from(&[(
            "SUPABASE_SERVICE_ROLE_KEY",
            "service-key",
        )]))
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        let result = LambdaConfig::from_lookup(lookup_from(&[("STORE_TIMEOUT_SECS", "soon")]));

        assert!(matches!(
            result,
            Err(CounterError::InvalidConfigValueError { ref field, .. }) if field == "STORE_TIMEOUT_SECS"
        ));
    }
}
