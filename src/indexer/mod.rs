//! Indexer - profile/badge reads from the eventually consistent GraphQL backend
//!
//! # Query lifecycle
//!
//! ```text
//! QueryHandle::spawn(indexer, query, token)
//!     │   (tokio task running ProfileIndexer::fetch_wallet)
//!     ├── wait()   → Ok(AddressResponse) | Err(SessionError)
//!     └── cancel() → aborts the task; reported once, also on drop
//! ```

pub mod graphql;
pub mod types;

pub use graphql::GraphQlIndexer;
pub use types::{AddressQuery, AddressResponse, WalletSnapshot};

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::{SessionError, SessionResult};

#[async_trait]
pub trait ProfileIndexer: Send + Sync {
    async fn fetch_wallet(&self, query: &AddressQuery, access_token: &str) -> SessionResult<AddressResponse>;
}

/// An in-flight indexer query that can be cancelled.
pub struct QueryHandle {
    task: JoinHandle<SessionResult<AddressResponse>>,
    cancelled: AtomicBool,
}

impl QueryHandle {
    pub fn spawn(indexer: Arc<dyn ProfileIndexer>, query: AddressQuery, access_token: String) -> Self {
        let task = tokio::spawn(async move { indexer.fetch_wallet(&query, &access_token).await });
        Self { task, cancelled: AtomicBool::new(false) }
    }

    pub async fn wait(&mut self) -> SessionResult<AddressResponse> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(SessionError::Cancelled),
            Err(e) => Err(SessionError::Indexer(format!("query task failed: {e}"))),
        }
    }

    /// Abort the query. Returns true for the first call only.
    pub fn cancel(&self) -> bool {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.task.abort();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct Pending {
        started: Arc<tokio::sync::Notify>,
        dropped: Arc<AtomicUsize>,
    }

    impl Pending {
        fn new() -> (Arc<Self>, Arc<tokio::sync::Notify>, Arc<AtomicUsize>) {
            let started = Arc::new(tokio::sync::Notify::new());
            let dropped = Arc::new(AtomicUsize::new(0));
            (Arc::new(Self { started: started.clone(), dropped: dropped.clone() }), started, dropped)
        }
    }

    struct DropCounter(Arc<AtomicUsize>);
    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ProfileIndexer for Pending {
        async fn fetch_wallet(&self, _: &AddressQuery, _: &str) -> SessionResult<AddressResponse> {
            let _guard = DropCounter(self.dropped.clone());
            self.started.notify_one();
            std::future::pending::<()>().await;
            Ok(AddressResponse::default())
        }
    }

    struct Ready;

    #[async_trait]
    impl ProfileIndexer for Ready {
        async fn fetch_wallet(&self, _: &AddressQuery, _: &str) -> SessionResult<AddressResponse> {
            Ok(AddressResponse::default())
        }
    }

    fn query() -> AddressQuery {
        AddressQuery { address: "0x0000000000000000000000000000000000000001".into(), chain_id: 137 }
    }

    #[tokio::test]
    async fn cancel_aborts_pending_fetch_once() {
        let (indexer, started, dropped) = Pending::new();
        let mut handle = QueryHandle::spawn(indexer, query(), "t".into());
        started.notified().await;

        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(matches!(handle.wait().await, Err(SessionError::Cancelled)));
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_cancels_pending_fetch() {
        let (indexer, started, dropped) = Pending::new();
        let handle = QueryHandle::spawn(indexer, query(), "t".into());
        started.notified().await;
        drop(handle);

        tokio::time::timeout(Duration::from_secs(1), async {
            while dropped.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("fetch future dropped");
    }

    #[tokio::test]
    async fn wait_returns_completed_response() {
        let mut handle = QueryHandle::spawn(Arc::new(Ready), query(), String::new());
        assert!(handle.wait().await.is_ok());
        assert!(!handle.is_cancelled());
    }
}
