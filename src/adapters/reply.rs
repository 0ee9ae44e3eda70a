use crate::core::{CounterSnapshot, Result};
use crate::utils::error::CounterError;
use serde_json::{json, Value};

pub const COUNT_PATH: &str = "/api/subscribers/count";
pub const HEALTH_PATH: &str = "/health";

const GENERIC_ERROR: &str = "Failed to fetch subscriber count";

/// Freshness directive attached to successful counter responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    max_age_secs: u64,
}

impl CachePolicy {
    pub const DEFAULT_MAX_AGE_SECS: u64 = 30;

    pub fn new(max_age_secs: u64) -> Self {
        Self { max_age_secs }
    }

    pub fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }

    pub fn header_value(&self) -> String {
        if self.max_age_secs == 0 {
            return "no-store".to_string();
        }
        format!(
            "public, s-maxage={age}, stale-while-revalidate={age}",
            age = self.max_age_secs
        )
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_AGE_SECS)
    }
}

/// Transport-neutral HTTP answer; each server adapter only copies these fields out.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub cache_control: String,
    pub body: Value,
}

impl Reply {
    pub fn content_type(&self) -> &'static str {
        "application/json"
    }

    pub fn body_string(&self) -> String {
        self.body.to_string()
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            cache_control: "no-store".to_string(),
            body: json!({ "error": message }),
        }
    }
}

/// 將服務結果轉為 HTTP 回應；錯誤一律回傳通用訊息
pub fn render_snapshot(result: Result<CounterSnapshot>, cache: &CachePolicy) -> Reply {
    match result.and_then(|snapshot| serde_json::to_value(snapshot).map_err(CounterError::from)) {
        Ok(body) => Reply {
            status: 200,
            cache_control: cache.header_value(),
            body,
        },
        Err(e) => {
            tracing::debug!(code = e.code(), "Answering counter request with 500");
            Reply::error(500, GENERIC_ERROR)
        }
    }
}

/// Routing for transports that hand over a bare method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Count,
    Health,
    NotFound,
    MethodNotAllowed,
}

pub fn resolve_route(method: &str, path: &str) -> Route {
    let route = match path {
        COUNT_PATH => Route::Count,
        HEALTH_PATH => Route::Health,
        _ => return Route::NotFound,
    };

    if method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD") {
        route
    } else {
        Route::MethodNotAllowed
    }
}

pub fn render_health() -> Reply {
    Reply {
        status: 200,
        cache_control: "no-store".to_string(),
        body: json!({ "status": "ok" }),
    }
}
