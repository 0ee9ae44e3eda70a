pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::reply::{render_snapshot, CachePolicy, Reply, COUNT_PATH};
pub use adapters::supabase::SupabaseStore;
pub use config::{lambda::LambdaConfig, toml_config::TomlConfig};
pub use crate::core::counter::CounterService;
pub use domain::model::{CounterSnapshot, EARLY_BIRD_CAPACITY};
pub use domain::ports::{ConfigProvider, SignupStore};
pub use utils::error::{CounterError, Result};
