use crate::adapters::reply::{render_health, render_snapshot, resolve_route, CachePolicy, Reply, Route, COUNT_PATH};
use crate::core::counter::CounterService;
use crate::core::SignupStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API Gateway proxy event, REST (v1) or HTTP API (v2) shape.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub raw_path: Option<String>,
    pub request_context: Option<RequestContext>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RequestContext {
    pub stage: Option<String>,
    pub http: Option<HttpContext>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HttpContext {
    pub method: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl From<Reply> for GatewayResponse {
    fn from(reply: Reply) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), reply.content_type().to_string());
        headers.insert("Cache-Control".to_string(), reply.cache_control.clone());

        Self {
            status_code: reply.status,
            headers,
            body: reply.body_string(),
            is_base64_encoded: false,
        }
    }
}

impl GatewayRequest {
    pub fn method(&self) -> &str {
        self.http_method
            .as_deref()
            .or_else(|| {
                self.request_context
                    .as_ref()
                    .and_then(|c| c.http.as_ref())
                    .and_then(|h| h.method.as_deref())
            })
            .unwrap_or("GET")
    }

    /// Path used for routing, with any named stage prefix removed.
    ///
    /// v1 `path` never carries the stage. v2 `rawPath` does for named stages, so it is
    /// stripped unless the stage is `$default`.
    pub fn route_path(&self) -> &str {
        if let Some(path) = self.path.as_deref() {
            return path;
        }

        let context = self.request_context.as_ref();
        let raw = self
            .raw_path
            .as_deref()
            .or_else(|| context.and_then(|c| c.http.as_ref()).and_then(|h| h.path.as_deref()));

        let Some(raw) = raw else {
            return COUNT_PATH;
        };

        match context.and_then(|c| c.stage.as_deref()) {
            Some(stage) if stage != "$default" => raw
                .strip_prefix('/')
                .and_then(|rest| rest.strip_prefix(stage))
                .filter(|rest| rest.starts_with('/'))
                .unwrap_or(raw),
            _ => raw,
        }
    }
}

/// 處理單一 API Gateway 事件
pub async fn handle_event<S: SignupStore>(
    request: &GatewayRequest,
    service: &CounterService<S>,
    cache: &CachePolicy,
) -> GatewayResponse {
    let method = request.method();
    let path = request.route_path();

    tracing::debug!("Gateway request: {} {}", method, path);

    let reply = match resolve_route(method, path) {
        Route::Count => render_snapshot(service.get_snapshot().await, cache),
        Route::Health => render_health(),
        Route::NotFound => Reply::error(404, "Not found"),
        Route::MethodNotAllowed => Reply::error(405, "Method not allowed"),
    };

    reply.into()
}
