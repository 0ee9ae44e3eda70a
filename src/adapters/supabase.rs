use crate::core::{ConfigProvider, Result, SignupStore};
use crate::utils::error::CounterError;
use crate::utils::validation::{validate_identifier, validate_non_empty_string, validate_url};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Counts rows of the signup table through the Supabase REST (PostgREST) API.
///
/// Uses `HEAD` with `Prefer: count=exact`, so no row payload crosses the wire and the
/// total comes back in `Content-Range`.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    count_url: String,
}

impl SupabaseStore {
    /// Fails when the endpoint or key is missing; this is meant to run at startup.
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        validate_url("supabase_url", config.supabase_url())?;
        validate_non_empty_string("supabase_key", config.supabase_key())?;
        validate_identifier("signups_table", config.signups_table())?;

        let key = config.supabase_key().trim();
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value("supabase_key", key)?);
        headers.insert(
            AUTHORIZATION,
            header_value("supabase_key", &format!("Bearer {}", key))?,
        );
        headers.insert("prefer", HeaderValue::from_static("count=exact"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()
            .map_err(|e| CounterError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let count_url = format!(
            "{}/rest/v1/{}?select=*",
            config.supabase_url().trim_end_matches('/'),
            config.signups_table()
        );

        tracing::debug!("Signup store count endpoint: {}", count_url);

        Ok(Self { client, count_url })
    }

    pub fn count_url(&self) -> &str {
        &self.count_url
    }
}

impl SignupStore for SupabaseStore {
    async fn count_signups(&self) -> Result<Option<u64>> {
        let response = self
            .client
            .head(&self.count_url)
            .send()
            .await
            .map_err(|e| CounterError::StoreUnavailable {
                message: describe_transport_error(&e),
            })?;

        let status = response.status();
        tracing::debug!("Signup store response status: {}", status);

        if !status.is_success() {
            return Err(CounterError::StoreQueryFailed {
                status: Some(status.as_u16()),
                message: failure_message(status),
            });
        }

        match response.headers().get(CONTENT_RANGE) {
            Some(value) => {
                let raw = value.to_str().map_err(|_| CounterError::StoreQueryFailed {
                    status: Some(status.as_u16()),
                    message: "Content-Range header is not valid ASCII".to_string(),
                })?;
                parse_content_range_total(raw)
            }
            None => {
                tracing::warn!("Signup store response has no Content-Range header");
                Ok(None)
            }
        }
    }
}

/// Total from a PostgREST `Content-Range` value such as `0-24/3573` or `*/0`.
/// A `*` total means the backend did not count.
pub fn parse_content_range_total(raw: &str) -> Result<Option<u64>> {
    let malformed = || CounterError::StoreQueryFailed {
        status: None,
        message: format!("Malformed Content-Range header: {}", raw),
    };

    let (_, total) = raw.trim().rsplit_once('/').ok_or_else(malformed)?;

    match total.trim() {
        "*" => Ok(None),
        digits => digits.parse::<u64>().map(Some).map_err(|_| malformed()),
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| CounterError::InvalidConfigValueError {
        field: field.to_string(),
        value: String::new(),
        reason: "Value contains characters not allowed in HTTP headers".to_string(),
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

fn failure_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            "permission denied for signups table".to_string()
        }
        StatusCode::NOT_FOUND => "signups table not found".to_string(),
        other => format!("backend responded with {}", other),
    }
}
