use crate::adapters::reply::{render_health, render_snapshot, CachePolicy, Reply, COUNT_PATH, HEALTH_PATH};
use crate::core::counter::CounterService;
use crate::core::{Result, SignupStore};
use axum::{
    extract::State,
    http::{header::CACHE_CONTROL, header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub struct AppState<S: SignupStore> {
    pub service: CounterService<S>,
    pub cache: CachePolicy,
}

impl<S: SignupStore> AppState<S> {
    pub fn new(service: CounterService<S>, cache: CachePolicy) -> Arc<Self> {
        Arc::new(Self { service, cache })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(CACHE_CONTROL, self.cache_control)], Json(self.body)).into_response()
    }
}

pub fn router<S: SignupStore + 'static>(state: Arc<AppState<S>>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route(COUNT_PATH, get(count_handler::<S>))
        .route(HEALTH_PATH, get(health_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn count_handler<S: SignupStore + 'static>(State(state): State<Arc<AppState<S>>>) -> Reply {
    render_snapshot(state.service.get_snapshot().await, &state.cache)
}

async fn health_handler() -> Reply {
    render_health()
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!("🚀 Serving subscriber counter on http://{}{}", address, COUNT_PATH);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
