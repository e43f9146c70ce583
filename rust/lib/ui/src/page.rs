use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Lifecycle state of an async-loaded page.
///
/// `Loading → {Loaded, Error}`; `Loaded` re-enters `Loading` on refresh
/// or range change; `Error` re-enters `Loading` on retry. No state is
/// terminal except dropping the loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PageState<T> {
    Loading,
    Loaded { data: T },
    Error { message: String },
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }
}

/// Drives the fetch lifecycle of a single page view.
///
/// Each `load` call supersedes the previous one: the old fetch task is
/// aborted and its result, should it still arrive, is discarded by a
/// generation check. Dropping the loader aborts the in-flight fetch, so
/// a late response can never mutate state after "unmount".
pub struct PageLoader<T> {
    tx: watch::Sender<PageState<T>>,
    rx: watch::Receiver<PageState<T>>,
    generation: Arc<AtomicU64>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<T: Clone + Send + Sync + 'static> PageLoader<T> {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(PageState::Loading);
        Self {
            tx,
            rx,
            generation: Arc::new(AtomicU64::new(0)),
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Current page state.
    pub fn state(&self) -> PageState<T> {
        self.rx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PageState<T>> {
        self.rx.clone()
    }

    /// Start (or restart) a fetch. Re-enters `Loading` immediately.
    ///
    /// The generation bump and the `Loading` publish happen under the
    /// task lock, and a fetch task re-checks its generation under the
    /// same lock before publishing, so a superseded fetch can never
    /// slip a stale result in between the two.
    pub fn load<F>(&self, fetch: F)
    where
        F: Future<Output = Result<T, String>> + Send + 'static,
    {
        let Ok(mut guard) = self.task.lock() else {
            return;
        };
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Abort whatever fetch was outstanding.
        if let Some(old) = guard.take() {
            old.abort();
        }

        self.tx.send_replace(PageState::Loading);

        let tx = self.tx.clone();
        let gen_counter = Arc::clone(&self.generation);
        let task_slot = Arc::clone(&self.task);
        *guard = Some(tokio::spawn(async move {
            let result = fetch.await;
            let Ok(_slot) = task_slot.lock() else {
                return;
            };
            // A newer load() superseded this fetch: drop the result.
            if gen_counter.load(Ordering::SeqCst) != generation {
                return;
            }
            let next = match result {
                Ok(data) => PageState::Loaded { data },
                Err(message) => PageState::Error { message },
            };
            tx.send_replace(next);
        }));
    }
}

impl<T: Clone + Send + Sync + 'static> Default for PageLoader<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PageLoader<T> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.task.lock() {
            if let Some(task) = guard.take() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_until_settled(rx: &mut watch::Receiver<PageState<i32>>) -> PageState<i32> {
        loop {
            let state = rx.borrow().clone();
            if !state.is_loading() {
                return state;
            }
            tokio::time::timeout(Duration::from_secs(1), rx.changed())
                .await
                .expect("state never settled")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn load_reaches_loaded() {
        let loader = PageLoader::new();
        let mut rx = loader.subscribe();
        assert!(loader.state().is_loading());

        loader.load(async { Ok(42) });
        assert_eq!(wait_until_settled(&mut rx).await, PageState::Loaded { data: 42 });
    }

    #[tokio::test]
    async fn failed_fetch_reaches_error_then_retry_recovers() {
        let loader = PageLoader::new();
        let mut rx = loader.subscribe();

        loader.load(async { Err("network down".to_string()) });
        assert_eq!(
            wait_until_settled(&mut rx).await,
            PageState::Error { message: "network down".into() }
        );

        // Retry re-enters loading, then loads.
        loader.load(async { Ok(7) });
        assert!(loader.state().is_loading());
        assert_eq!(wait_until_settled(&mut rx).await, PageState::Loaded { data: 7 });
    }

    #[tokio::test]
    async fn reload_reenters_loading() {
        let loader = PageLoader::new();
        let mut rx = loader.subscribe();
        loader.load(async { Ok(1) });
        wait_until_settled(&mut rx).await;

        loader.load(async { Ok(2) });
        assert!(loader.state().is_loading());
        assert_eq!(wait_until_settled(&mut rx).await, PageState::Loaded { data: 2 });
    }

    #[tokio::test]
    async fn superseded_fetch_never_wins() {
        let loader = PageLoader::new();
        let mut rx = loader.subscribe();

        loader.load(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(1)
        });
        loader.load(async { Ok(2) });

        assert_eq!(wait_until_settled(&mut rx).await, PageState::Loaded { data: 2 });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(loader.state(), PageState::Loaded { data: 2 });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn rapid_concurrent_reloads_settle_on_the_latest() {
        let loader = Arc::new(PageLoader::new());
        let mut rx = loader.subscribe();

        // Hammer the loader from several tasks; the final load must win
        // no matter how the earlier fetches interleave.
        let mut handles = Vec::new();
        for i in 0..50 {
            let loader = Arc::clone(&loader);
            handles.push(tokio::spawn(async move {
                loader.load(async move { Ok(i) });
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        loader.load(async { Ok(999) });

        assert_eq!(wait_until_settled(&mut rx).await, PageState::Loaded { data: 999 });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(loader.state(), PageState::Loaded { data: 999 });
    }

    #[tokio::test]
    async fn drop_while_fetch_outstanding_is_safe() {
        let loader: PageLoader<i32> = PageLoader::new();
        let rx = loader.subscribe();

        loader.load(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(99)
        });
        drop(loader);

        // The aborted fetch must not resolve into the channel.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.borrow().is_loading());
    }
}
