use clap::Parser;
use signup_counter::adapters::server::{self, AppState};
use signup_counter::utils::error::{CounterError, ErrorSeverity, Result};
use signup_counter::utils::{logger, validation::validate_socket_addr, validation::Validate};
use signup_counter::{CachePolicy, CliConfig, ConfigProvider, CounterService, SupabaseStore, TomlConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (若有指定)
    let toml = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    match &toml {
        Some(config) if !cli.verbose => logger::init_with_level(config.log_level()),
        _ => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting signup-counter");

    let result = match toml {
        Some(config) => {
            tracing::info!("📁 Using configuration file");
            let bind_address = config.bind_address().to_string();
            let allowed_origins = config.allowed_origins().to_vec();
            run(config, &bind_address, &allowed_origins).await
        }
        None => {
            tracing::debug!("CLI config: {}", cli.summary());
            let bind_address = cli.bind_address.clone();
            let allowed_origins = cli.allowed_origins.clone();
            run(cli, &bind_address, &allowed_origins).await
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ signup-counter stopped: {} (Code: {}, Category: {:?}, Severity: {:?})",
            e,
            e.code(),
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        std::process::exit(exit_code(&e));
    }
}

async fn run<C>(config: C, bind_address: &str, allowed_origins: &[String]) -> Result<()>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    config.validate()?;
    let address = validate_socket_addr("bind_address", bind_address)?;

    let store = SupabaseStore::new(&config)?;
    tracing::info!("✅ Signup store configured: {}", store.count_url());

    let cache = CachePolicy::new(config.cache_max_age_secs());
    let state = AppState::new(CounterService::new(store), cache);
    let app = server::router(state, allowed_origins);

    let listener = TcpListener::bind(address).await?;
    server::serve(listener, app).await
}

fn exit_code(e: &CounterError) -> i32 {
    if e.is_config_error() {
        return 1;
    }

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
