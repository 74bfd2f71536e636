// Shared fixtures for the behavior tests
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub use sentimeter_collect::{
    BackoffPolicy, FetchFuture, FetchRequest, IndicatorSource, ReadingCollector, Scope,
    SentimentPipeline, SourceError, SourceId, SourcePayload, SourcePolicy,
};
pub use sentimeter_core::{
    IndicatorKind, IndicatorReading, PolarityEstimator, RawMeasurement, SentimentEngine, Symbol,
    UtcDateTime,
};
pub use std::sync::Arc;

pub const TOLERANCE: f64 = 1e-12;

pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < TOLERANCE
}

pub fn present(measurement: RawMeasurement) -> IndicatorReading {
    IndicatorReading::present(measurement, UtcDateTime::now())
}

pub fn absent(kind: IndicatorKind) -> IndicatorReading {
    IndicatorReading::absent(kind, UtcDateTime::now())
}

/// Estimator returning the same polarity for every text.
#[derive(Debug, Clone, Copy)]
pub struct FixedEstimator(pub f64);

impl PolarityEstimator for FixedEstimator {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn estimate(&self, _text: &str) -> f64 {
        self.0
    }
}

/// Source answering from a fixed table, or failing for kinds it has no entry for.
pub struct TableSource {
    id: SourceId,
    payloads: HashMap<IndicatorKind, SourcePayload>,
    failure: SourceError,
    calls: AtomicU32,
}

impl TableSource {
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            payloads: HashMap::new(),
            failure: SourceError::unavailable("upstream unreachable"),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with(mut self, kind: IndicatorKind, payload: SourcePayload) -> Self {
        self.payloads.insert(kind, payload);
        self
    }

    pub fn with_measurement(self, measurement: RawMeasurement) -> Self {
        let kind = measurement.kind();
        self.with(kind, SourcePayload::Measurement(measurement))
    }

    pub fn failing_with(mut self, failure: SourceError) -> Self {
        self.failure = failure;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IndicatorSource for TableSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn fetch<'a>(&'a self, req: FetchRequest) -> FetchFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads
                .get(&req.kind)
                .cloned()
                .ok_or_else(|| self.failure.clone())
        })
    }
}

/// Default policy for `id` without call spacing and with millisecond backoff.
pub fn fast_policy(id: SourceId) -> SourcePolicy {
    SourcePolicy {
        min_interval: Duration::ZERO,
        retry_backoff: BackoffPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
            max_retries: 2,
        },
        ..SourcePolicy::default_for(id)
    }
}

pub fn collector_with(sources: Vec<Arc<TableSource>>) -> ReadingCollector {
    let mut collector = ReadingCollector::default();
    for source in sources {
        let policy = fast_policy(source.id());
        collector.register(source, policy);
    }
    collector
}
