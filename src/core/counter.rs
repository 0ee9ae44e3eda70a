use crate::core::{CounterSnapshot, Result, SignupStore};
use std::time::Instant;

/// Answers "how many early-bird slots are left" from a single count query.
///
/// Holds no state besides the store handle, so one instance can serve any number
/// of concurrent requests.
pub struct CounterService<S: SignupStore> {
    store: S,
}

impl<S: SignupStore> CounterService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn get_snapshot(&self) -> Result<CounterSnapshot> {
        let started = Instant::now();

        // 不做內部重試，失敗直接回傳給呼叫端
        let count = match self.store.count_signups().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(
                    code = e.code(),
                    category = ?e.category(),
                    severity = ?e.severity(),
                    "❌ Signup count query failed: {}",
                    e
                );
                return Err(e);
            }
        };

        let current = count.unwrap_or_else(|| {
            tracing::debug!("Store returned no count, treating as zero signups");
            0
        });

        let snapshot = CounterSnapshot::capture(current);

        tracing::debug!(
            current = snapshot.current(),
            remaining = snapshot.remaining(),
            progress = snapshot.progress_percentage(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Computed counter snapshot"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CounterError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Answer {
        Count(Option<u64>),
        Unavailable,
        Rejected,
    }

    struct MockStore {
        answer: Answer,
        calls: Arc<AtomicUsize>,
    }

    impl MockStore {
        fn new(answer: Answer) -> Self {
            Self {
                answer,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl SignupStore for MockStore {
        async fn count_signups(&self) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Count(count) => Ok(count),
                Answer::Unavailable => Err(CounterError::StoreUnavailable {
                    message: "connection refused".to_string(),
                }),
                Answer::Rejected => Err(CounterError::StoreQueryFailed {
                    status: Some(401),
                    message: "Invalid API key".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_snapshot_from_count() {
        let service = CounterService::new(MockStore::new(Answer::Count(Some(167))));

        let snapshot = service.get_snapshot().await.unwrap();

        assert_eq!(snapshot.current(), 167);
        assert_eq!(snapshot.remaining(), 333);
        assert_eq!(snapshot.progress_percentage(), 33.4);
        assert!(snapshot.is_early_bird_available());
    }

    #[tokio::test]
    async fn test_absent_count_is_zero() {
        let service = CounterService::new(MockStore::new(Answer::Count(None)));

        let snapshot = service.get_snapshot().await.unwrap();

        assert_eq!(snapshot.current(), 0);
        assert_eq!(snapshot.remaining(), 500);
        assert_eq!(snapshot.progress_percentage(), 0.0);
    }

    #[tokio::test]
    async fn test_unavailable_store_is_not_retried() {
        let store = MockStore::new(Answer::Unavailable);
        let calls = store.calls.clone();
        let service = CounterService::new(store);

        let err = service.get_snapshot().await.unwrap_err();

        assert!(matches!(err, CounterError::StoreUnavailable { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let service = CounterService::new(MockStore::new(Answer::Rejected));

        let err = service.get_snapshot().await.unwrap_err();

        assert_eq!(err.code(), "STORE_QUERY_FAILED");
    }

    #[tokio::test]
    async fn test_repeated_snapshots_agree() {
        let service = CounterService::new(MockStore::new(Answer::Count(Some(499))));

        let first = service.get_snapshot().await.unwrap();
        let second = service.get_snapshot().await.unwrap();

        assert!(first.same_state(&second));
        assert!(first.is_early_bird_available());
        assert_eq!(first.remaining(), 1);
    }
}
