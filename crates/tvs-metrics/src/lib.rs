use std::sync::Arc;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Gauge},
};

#[derive(Debug)]
pub struct MetricsRegistry {
    pub updates: Arc<UpdateMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: UpdateMetrics::new(),
        })
    }
}

#[derive(Debug)]
pub struct UpdateMetrics {
    fetches: Counter<u64>,
    presence_updates: Counter<u64>,
    last_total: Gauge<f64>,
}

impl UpdateMetrics {
    fn new() -> Arc<Self> {
        let meter = global::meter("tvs-presence-bot");
        let fetches = meter
            .u64_counter("tvs_fetch_total")
            .with_description("Number of TVS fetches by source and outcome")
            .with_unit("count")
            .build();

        let presence_updates = meter
            .u64_counter("tvs_presence_updates_total")
            .with_description("Number of presence publications by outcome")
            .with_unit("count")
            .build();

        let last_total = meter
            .f64_gauge("tvs_last_total_usd")
            .with_description("Last fetched Total Value Secured")
            .with_unit("USD")
            .build();

        Arc::new(Self {
            fetches,
            presence_updates,
            last_total,
        })
    }

    pub fn record_fetch(&self, source: &str, outcome: FetchOutcome) {
        self.fetches.add(
            1,
            &[
                KeyValue::new("source", source.to_string()),
                KeyValue::new("outcome", outcome.as_str()),
            ],
        );
    }

    pub fn record_total(&self, source: &str, total: f64) {
        self.last_total
            .record(total, &[KeyValue::new("source", source.to_string())]);
    }

    pub fn record_presence_update(&self, outcome: &'static str) {
        self.presence_updates
            .add(1, &[KeyValue::new("outcome", outcome)]);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum FetchOutcome {
    Success,
    Failure,
}

impl FetchOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}
