pub mod counter;

pub use crate::domain::model::{CounterSnapshot, EARLY_BIRD_CAPACITY};
pub use crate::domain::ports::{ConfigProvider, SignupStore};
pub use crate::utils::error::Result;
