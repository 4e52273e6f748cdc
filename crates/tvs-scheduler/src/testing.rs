//! Test doubles shared by the service and task tests.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::time::{Instant, sleep};
use tvs_fetcher::{FetchError, MetricFetcher, MetricSource};
use tvs_metrics::MetricsRegistry;
use tvs_presence::{Presence, PresenceError, PresenceSession, StatusPublisher};
use tvs_types::{Category, CategoryBreakdown, MetricReading};

use crate::{config::parse_schedule, service::UpdateService};

/// Source returning the same chain values on every call, or failing.
/// Each call can be slowed down to keep cycles in flight.
pub(crate) struct CannedSource {
    chain_values: Option<Vec<(Category, f64)>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    finished: AtomicUsize,
    starts: Mutex<Vec<Instant>>,
}

impl CannedSource {
    pub(crate) fn new(chain_values: Option<Vec<(Category, f64)>>) -> Arc<Self> {
        Self::slow(chain_values, Duration::ZERO)
    }

    pub(crate) fn slow(chain_values: Option<Vec<(Category, f64)>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            chain_values,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            starts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.starts.lock().unwrap().len()
    }

    pub(crate) fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MetricSource for CannedSource {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn fetch(&self) -> Result<MetricReading, FetchError> {
        self.starts.lock().unwrap().push(Instant::now());
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);

        let values = self
            .chain_values
            .as_ref()
            .ok_or(FetchError::MissingField("currentChainTvls"))?;

        let mut breakdown = CategoryBreakdown::default();
        for (category, value) in values {
            breakdown.add(*category, *value);
        }
        Ok(MetricReading::from_breakdown(breakdown, "canned"))
    }
}

#[derive(Default)]
pub(crate) struct FakeSession {
    ready: AtomicBool,
    updates: Mutex<Vec<Presence>>,
}

impl FakeSession {
    pub(crate) fn with_ready(ready: bool) -> Arc<Self> {
        let session = Self::default();
        session.ready.store(ready, Ordering::SeqCst);
        Arc::new(session)
    }

    pub(crate) fn updates(&self) -> Vec<Presence> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PresenceSession for FakeSession {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn wait_until_ready(&self) {
        if !self.is_ready() {
            std::future::pending::<()>().await;
        }
    }

    async fn set_presence(&self, presence: Presence) -> Result<(), PresenceError> {
        self.updates.lock().unwrap().push(presence);
        Ok(())
    }
}

pub(crate) fn update_service(
    source: Arc<CannedSource>,
    session: Arc<FakeSession>,
    schedule: &str,
) -> Arc<UpdateService> {
    Arc::new(UpdateService::new(
        MetricFetcher::new(source),
        StatusPublisher::new(session, "RedStone"),
        parse_schedule(schedule).unwrap(),
        MetricsRegistry::new().updates.clone(),
    ))
}

pub(crate) fn redstone_values() -> Option<Vec<(Category, f64)>> {
    Some(vec![
        (Category::Tvl, 1_000_000_000.0),
        (Category::Staking, 200_000_000.0),
        (Category::Borrowed, 34_567_890.0),
    ])
}
