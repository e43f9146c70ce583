use std::sync::{Arc, Mutex};

use kontor_ui::{PageLoader, PageState};

use crate::range::TimeRange;
use crate::service::{DashboardService, DashboardSummary};

/// The dashboard page: a loader over the summary plus the currently
/// selected range.
///
/// Changing the range or retrying after an error re-enters `Loading`
/// and supersedes any fetch still in flight.
pub struct DashboardPage {
    service: Arc<DashboardService>,
    loader: PageLoader<DashboardSummary>,
    range: Mutex<TimeRange>,
}

impl DashboardPage {
    /// Create the page and kick off the initial fetch.
    pub fn open(service: Arc<DashboardService>, range: TimeRange) -> Self {
        let page = Self {
            service,
            loader: PageLoader::new(),
            range: Mutex::new(range),
        };
        page.fetch(range);
        page
    }

    pub fn state(&self) -> PageState<DashboardSummary> {
        self.loader.state()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<PageState<DashboardSummary>> {
        self.loader.subscribe()
    }

    pub fn range(&self) -> TimeRange {
        self.range.lock().map(|r| *r).unwrap_or_default()
    }

    /// Switch the reporting window and refetch.
    pub fn set_range(&self, range: TimeRange) {
        if let Ok(mut guard) = self.range.lock() {
            *guard = range;
        }
        self.fetch(range);
    }

    /// Refetch with the current range (refresh, or retry after an error).
    pub fn refresh(&self) {
        self.fetch(self.range());
    }

    fn fetch(&self, range: TimeRange) {
        let service = Arc::clone(&self.service);
        self.loader.load(async move {
            tokio::task::spawn_blocking(move || {
                service.summary(range).map_err(|e| e.to_string())
            })
            .await
            .map_err(|e| e.to_string())?
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm::service::CrmService;
    use kontor_sql::{SQLStore, SqliteStore};

    async fn settled(page: &DashboardPage) -> PageState<DashboardSummary> {
        let mut rx = page.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            if !state.is_loading() {
                return state;
            }
            rx.changed().await.unwrap();
        }
    }

    fn services() -> (Arc<CrmService>, Arc<DashboardService>) {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        let crm = Arc::new(CrmService::new(sql.clone()).unwrap());
        (crm, Arc::new(DashboardService::new(sql)))
    }

    #[tokio::test]
    async fn open_loads_the_summary() {
        let (crm, dash) = services();
        crm.seed_demo(6, 5).unwrap();

        let page = DashboardPage::open(dash, TimeRange::Last7Days);
        match settled(&page).await {
            PageState::Loaded { data } => {
                assert_eq!(data.range, TimeRange::Last7Days);
                assert_eq!(data.cards[0].value, 6.0);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn set_range_refetches_with_the_new_window() {
        let (_, dash) = services();
        let page = DashboardPage::open(dash, TimeRange::Last7Days);
        settled(&page).await;

        page.set_range(TimeRange::Last90Days);
        assert_eq!(page.range(), TimeRange::Last90Days);
        match settled(&page).await {
            PageState::Loaded { data } => {
                assert_eq!(data.range, TimeRange::Last90Days);
                assert_eq!(data.daily_new_persons.len(), 90);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_reenters_loading() {
        let (_, dash) = services();
        let page = DashboardPage::open(dash, TimeRange::Last30Days);
        settled(&page).await;

        let mut rx = page.subscribe();
        rx.borrow_and_update();
        page.refresh();
        // The first observable transition after refresh is Loading.
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_loading());
        assert!(matches!(settled(&page).await, PageState::Loaded { .. }));
    }
}
