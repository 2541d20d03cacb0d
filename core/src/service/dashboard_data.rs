use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::model::rollup::TimesheetRollup;
use crate::repository::traits::EntryRepository;
use crate::usecase::rollup::build_rollup;

/// Outcome of a chart-data request. `NoData` means the backend had zero
/// entries for the user ("nothing to chart"); it is cached like any other
/// result. A rollup over zero entries cannot occur.
#[derive(Debug, Clone)]
pub enum ChartData {
    NoData,
    Ready(Arc<TimesheetRollup>),
}

impl ChartData {
    pub fn rollup(&self) -> Option<&TimesheetRollup> {
        match self {
            ChartData::Ready(rollup) => Some(rollup),
            ChartData::NoData => None,
        }
    }
}

// Errors cross the broadcast channel as display strings; broadcast payloads
// must be Clone and anyhow errors are not.
type FetchOutcome = std::result::Result<ChartData, String>;

#[derive(Default)]
struct CacheState {
    ready: HashMap<String, ChartData>,
    in_flight: HashMap<String, broadcast::Sender<FetchOutcome>>,
}

/// Fetches, computes and caches timesheet rollups per user id.
///
/// Concurrent requests for the same user are coalesced: the first caller
/// runs the fetch, later callers subscribe to its outcome, so at most one
/// fetch-and-compute is in flight per user at any time. Results are cached
/// for the lifetime of the service with no eviction; failures are never
/// cached, so the next request after an error fetches again.
pub struct DashboardDataService<R: EntryRepository> {
    repo: R,
    state: Mutex<CacheState>,
}

impl<R: EntryRepository> DashboardDataService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub async fn get_chart_data(&self, user_id: &str) -> Result<ChartData> {
        // Both maps are checked and updated under one lock so a result can
        // never be cached while a duplicate fetch is being registered.
        let waiter = {
            let mut state = self.state.lock().await;
            if let Some(hit) = state.ready.get(user_id) {
                debug!(user_id, "serving cached chart data");
                return Ok(hit.clone());
            }
            match state.in_flight.get(user_id) {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _) = broadcast::channel(1);
                    state.in_flight.insert(user_id.to_string(), tx);
                    None
                }
            }
        };

        if let Some(mut rx) = waiter {
            debug!(user_id, "joining in-flight fetch");
            return match rx.recv().await {
                Ok(Ok(data)) => Ok(data),
                Ok(Err(message)) => Err(anyhow!(message)),
                Err(_) => Err(anyhow!("fetch for {} was abandoned", user_id)),
            };
        }

        // This caller registered the in-flight marker and runs the fetch.
        let outcome = self.fetch_and_compute(user_id).await;

        let mut state = self.state.lock().await;
        let tx = state.in_flight.remove(user_id);
        match outcome {
            Ok(data) => {
                state.ready.insert(user_id.to_string(), data.clone());
                if let Some(tx) = tx {
                    let _ = tx.send(Ok(data.clone()));
                }
                Ok(data)
            }
            Err(err) => {
                // Not cached: the in-flight marker is gone, so the next
                // request for this user retries from scratch.
                warn!(user_id, error = %err, "timesheet fetch failed");
                if let Some(tx) = tx {
                    let _ = tx.send(Err(err.to_string()));
                }
                Err(err)
            }
        }
    }

    async fn fetch_and_compute(&self, user_id: &str) -> Result<ChartData> {
        let entries = self.repo.fetch_entries(user_id).await?;
        match build_rollup(&entries) {
            Some(rollup) => {
                info!(user_id, entries = entries.len(), "computed timesheet rollup");
                Ok(ChartData::Ready(Arc::new(rollup)))
            }
            None => {
                info!(user_id, "no timesheet entries");
                Ok(ChartData::NoData)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::{EntryKind, TimesheetEntry};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_entries() -> Vec<TimesheetEntry> {
        vec![TimesheetEntry::new(
            EntryKind::Attendance,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "ProjA",
            8.0,
        )]
    }

    struct CountingRepo {
        calls: AtomicUsize,
        entries: Vec<TimesheetEntry>,
    }

    impl CountingRepo {
        fn new(entries: Vec<TimesheetEntry>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                entries,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EntryRepository for CountingRepo {
        async fn fetch_entries(&self, _user_id: &str) -> Result<Vec<TimesheetEntry>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Suspend once so concurrent callers can observe the in-flight
            // fetch and attach to it.
            tokio::task::yield_now().await;
            Ok(self.entries.clone())
        }
    }

    // Fails the first fetch, succeeds afterwards.
    struct FlakyRepo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EntryRepository for FlakyRepo {
        async fn fetch_entries(&self, _user_id: &str) -> Result<Vec<TimesheetEntry>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if call == 0 {
                Err(anyhow!("backend unavailable"))
            } else {
                Ok(sample_entries())
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let service = DashboardDataService::new(CountingRepo::new(sample_entries()));

        let (a, b) = tokio::join!(
            service.get_chart_data("U1"),
            service.get_chart_data("U1")
        );

        assert_eq!(service.repo.call_count(), 1);
        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(a.rollup().unwrap().years[0].totals.duration, 8.0);
        assert_eq!(b.rollup().unwrap().years[0].totals.duration, 8.0);
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let service = DashboardDataService::new(CountingRepo::new(sample_entries()));

        service.get_chart_data("U1").await.unwrap();
        let again = service.get_chart_data("U1").await.unwrap();

        assert_eq!(service.repo.call_count(), 1);
        assert!(again.rollup().is_some());
    }

    #[tokio::test]
    async fn test_distinct_users_fetch_separately() {
        let service = DashboardDataService::new(CountingRepo::new(sample_entries()));

        service.get_chart_data("U1").await.unwrap();
        service.get_chart_data("U2").await.unwrap();

        assert_eq!(service.repo.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_fetch_yields_no_data_and_is_cached() {
        let service = DashboardDataService::new(CountingRepo::new(Vec::new()));

        let first = service.get_chart_data("U1").await.unwrap();
        let second = service.get_chart_data("U1").await.unwrap();

        assert!(matches!(first, ChartData::NoData));
        assert!(matches!(second, ChartData::NoData));
        assert_eq!(service.repo.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached_and_retries() {
        let service = DashboardDataService::new(FlakyRepo {
            calls: AtomicUsize::new(0),
        });

        let first = service.get_chart_data("U2").await;
        assert!(first.is_err());

        let second = service.get_chart_data("U2").await.unwrap();
        assert!(second.rollup().is_some());
        assert_eq!(service.repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_reaches_all_concurrent_waiters() {
        let service = DashboardDataService::new(FlakyRepo {
            calls: AtomicUsize::new(0),
        });

        let (a, b) = tokio::join!(
            service.get_chart_data("U2"),
            service.get_chart_data("U2")
        );

        assert!(a.is_err());
        assert!(b.is_err());
        // Both callers shared the single failed fetch
        assert_eq!(service.repo.calls.load(Ordering::SeqCst), 1);
    }
}
