use clap::Parser;
use signup_counter::utils::error::ErrorSeverity;
use signup_counter::utils::{logger, validation::Validate};
use signup_counter::{CliConfig, CounterService, SupabaseStore};

/// 對設定好的 Supabase 專案執行一次計數並輸出 JSON
#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let store = match SupabaseStore::new(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    println!("🔍 Querying {}", store.count_url());
    let service = CounterService::new(store);

    match service.get_snapshot().await {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("❌ Failed to serialize snapshot: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            // 開發工具可以顯示內部錯誤細節
            eprintln!("❌ {} [{}]", e, e.code());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
