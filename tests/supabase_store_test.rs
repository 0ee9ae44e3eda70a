use httpmock::prelude::*;
use httpmock::Method::HEAD;
use signup_counter::{ConfigProvider, CounterError, CounterService, SignupStore, SupabaseStore};
use std::time::Duration;

struct MockConfig {
    url: String,
    key: String,
    table: String,
    timeout_secs: u64,
}

impl MockConfig {
    fn new(url: String) -> Self {
        Self {
            url,
            key: "service-role-key".to_string(),
            table: "email_signups".to_string(),
            timeout_secs: 5,
        }
    }
}

impl ConfigProvider for MockConfig {
    fn supabase_url(&self) -> &str {
        &self.url
    }

    fn supabase_key(&self) -> &str {
        &self.key
    }

    fn signups_table(&self) -> &str {
        &self.table
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn cache_max_age_secs(&self) -> u64 {
        30
    }
}

#[tokio::test]
async fn test_count_query_sends_postgrest_headers() {
    let server = MockServer::start_async().await;

    let count_mock = server
        .mock_async(|when, then| {
            when.method(HEAD)
                .path("/rest/v1/email_signups")
                .query_param("select", "*")
                .header("apikey", "service-role-key")
                .header("Authorization", "Bearer service-role-key")
                .header("Prefer", "count=exact");
            then.status(200).header("Content-Range", "*/167");
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    let count = store.count_signups().await.unwrap();

    count_mock.assert_async().await;
    assert_eq!(count, Some(167));
}

#[tokio::test]
async fn test_trailing_slash_in_url_is_ignored() {
    let server = MockServer::start_async().await;

    let count_mock = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(200).header("Content-Range", "0-0/3");
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(format!("{}/", server.base_url()))).unwrap();

    assert_eq!(store.count_signups().await.unwrap(), Some(3));
    count_mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_total_is_absent_count() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(200).header("Content-Range", "*/*");
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    assert_eq!(store.count_signups().await.unwrap(), None);

    // 服務層把缺少的計數當作零
    let snapshot = CounterService::new(store).get_snapshot().await.unwrap();
    assert_eq!(snapshot.current(), 0);
    assert_eq!(snapshot.remaining(), 500);
}

#[tokio::test]
async fn test_missing_content_range_is_absent_count() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(200);
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    assert_eq!(store.count_signups().await.unwrap(), None);
}

#[tokio::test]
async fn test_permission_denied_is_query_failure() {
    let server = MockServer::start_async().await;

    let count_mock = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(401);
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    let err = store.count_signups().await.unwrap_err();

    // 不應重試
    count_mock.assert_hits_async(1).await;
    match err {
        CounterError::StoreQueryFailed { status, .. } => assert_eq!(status, Some(401)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_query_failure() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(503);
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    let err = store.count_signups().await.unwrap_err();

    assert_eq!(err.code(), "STORE_QUERY_FAILED");
}

#[tokio::test]
async fn test_malformed_content_range_is_query_failure() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(200).header("Content-Range", "lots");
        })
        .await;

    let store = SupabaseStore::new(&MockConfig::new(server.base_url())).unwrap();
    let err = store.count_signups().await.unwrap_err();

    assert!(matches!(err, CounterError::StoreQueryFailed { .. }));
}

#[tokio::test]
async fn test_unreachable_store_is_unavailable() {
    // 埠 1 上不會有服務
    let store = SupabaseStore::new(&MockConfig::new("http://127.0.0.1:1".to_string())).unwrap();

    let err = store.count_signups().await.unwrap_err();

    assert!(matches!(err, CounterError::StoreUnavailable { .. }));
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/rest/v1/email_signups");
            then.status(200)
                .header("Content-Range", "*/1")
                .delay(Duration::from_secs(3));
        })
        .await;

    let mut config = MockConfig::new(server.base_url());
    config.timeout_secs = 1;

    let store = SupabaseStore::new(&config).unwrap();
    let err = store.count_signups().await.unwrap_err();

    assert!(matches!(err, CounterError::StoreUnavailable { .. }));
}

#[test]
fn test_missing_credentials_fail_at_construction() {
    let mut config = MockConfig::new("https://abc.supabase.co".to_string());
    config.key = String::new();

    let err = SupabaseStore::new(&config).unwrap_err();
    assert!(err.is_config_error());

    let config = MockConfig::new(String::new());
    assert!(SupabaseStore::new(&config).unwrap_err().is_config_error());
}

#[test]
fn test_table_name_must_be_identifier() {
    let mut config = MockConfig::new("https://abc.supabase.co".to_string());
    config.table = "email_signups?select=email".to_string();

    assert!(SupabaseStore::new(&config).is_err());
}

#[test]
fn test_count_url() {
    let mut config = MockConfig::new("https://abc.supabase.co".to_string());
    config.table = "waitlist".to_string();

    let store = SupabaseStore::new(&config).unwrap();
    assert_eq!(store.count_url(), "https://abc.supabase.co/rest/v1/waitlist?select=*");
}
