#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use signup_counter::adapters::gateway::{handle_event, GatewayRequest, GatewayResponse};
#[cfg(feature = "lambda")]
use signup_counter::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use signup_counter::{CachePolicy, ConfigProvider, CounterService, LambdaConfig, SupabaseStore};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
struct Handler {
    service: CounterService<SupabaseStore>,
    cache: CachePolicy,
}

#[cfg(feature = "lambda")]
async fn function_handler(
    event: LambdaEvent<GatewayRequest>,
    handler: &Handler,
) -> Result<GatewayResponse, Error> {
    Ok(handle_event(&event.payload, &handler.service, &handler.cache).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 設定錯誤在冷啟動時就失敗
    let config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let store = SupabaseStore::new(&config)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let handler = Arc::new(Handler {
        service: CounterService::new(store),
        cache: CachePolicy::new(config.cache_max_age_secs()),
    });

    tracing::info!("Subscriber counter Lambda ready");

    run(service_fn(move |event: LambdaEvent<GatewayRequest>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(event, &handler).await }
    }))
    .await
}
