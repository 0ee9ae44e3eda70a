use crate::utils::error::Result;

/// Read side of the signup table.
pub trait SignupStore: Send + Sync {
    /// Row count of the signup table. `None` when the backend reports no count.
    fn count_signups(&self) -> impl std::future::Future<Output = Result<Option<u64>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn supabase_url(&self) -> &str;
    fn supabase_key(&self) -> &str;
    fn signups_table(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn cache_max_age_secs(&self) -> u64;
}
