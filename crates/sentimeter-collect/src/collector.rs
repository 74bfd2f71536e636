use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sentimeter_core::labels::TextLabel;
use sentimeter_core::{
    BandTable, IndicatorKind, IndicatorReading, TextBatchSummary, TextSentimentCombiner,
    UtcDateTime,
};
use tracing::{debug, warn};

use crate::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::indicator_source::{FetchRequest, IndicatorSource, Scope, SourceError, SourcePayload};
use crate::provider_policy::SourcePolicy;
use crate::throttling::{Throttle, ThrottlingQueue};
use crate::SourceId;

const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5);

/// Readings gathered for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// One reading per requested kind, in request order.
    pub readings: Vec<IndicatorReading>,
    pub text_summary: Option<TextBatchSummary>,
    pub warnings: Vec<String>,
}

impl Collection {
    pub fn reading(&self, kind: IndicatorKind) -> Option<&IndicatorReading> {
        self.readings.iter().find(|reading| reading.kind() == kind)
    }

    pub fn absent_kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.readings
            .iter()
            .filter(|reading| !reading.is_present())
            .map(IndicatorReading::kind)
    }
}

struct RegisteredSource {
    source: Arc<dyn IndicatorSource>,
    queue: ThrottlingQueue,
    breaker: CircuitBreaker,
}

/// Registry of sources with per-source throttling and circuit breaking.
///
/// Collection never fails: every problem reaching a source becomes an absent
/// reading plus a warning, which the aggregation core already tolerates.
pub struct ReadingCollector {
    sources: HashMap<SourceId, RegisteredSource>,
    combiner: Arc<TextSentimentCombiner>,
    max_wait: Duration,
}

impl Default for ReadingCollector {
    fn default() -> Self {
        Self::new(Arc::new(TextSentimentCombiner::standard()))
    }
}

impl ReadingCollector {
    pub fn new(combiner: Arc<TextSentimentCombiner>) -> Self {
        Self {
            sources: HashMap::new(),
            combiner,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }

    /// Longest throttle delay the collector will sleep through before
    /// reporting the source as rate limited.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Labels text summaries with `bands` instead of the combiner's current table.
    pub fn with_text_bands(mut self, bands: BandTable<TextLabel>) -> Self {
        let combiner = self.combiner.as_ref().clone().with_bands(bands);
        self.combiner = Arc::new(combiner);
        self
    }

    /// Registers `source` under its default policy.
    pub fn with_source(mut self, source: Arc<dyn IndicatorSource>) -> Self {
        let policy = SourcePolicy::default_for(source.id());
        self.register(source, policy);
        self
    }

    /// Registers `source`, replacing any source with the same id.
    pub fn register(&mut self, source: Arc<dyn IndicatorSource>, policy: SourcePolicy) {
        let id = source.id();
        if policy.source_id != id {
            warn!(
                source = %id,
                policy = %policy.source_id,
                "registering source under a policy for another source"
            );
        }

        let entry = RegisteredSource {
            source,
            queue: ThrottlingQueue::from_policy(&policy),
            breaker: CircuitBreaker::from_policy(&policy),
        };
        if self.sources.insert(id, entry).is_some() {
            debug!(source = %id, "replaced registered source");
        }
    }

    pub fn registered(&self) -> Vec<SourceId> {
        let mut ids = self.sources.keys().copied().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    pub fn circuit_state(&self, id: SourceId) -> Option<CircuitState> {
        self.sources.get(&id).map(|entry| entry.breaker.state())
    }

    pub fn combiner(&self) -> &TextSentimentCombiner {
        &self.combiner
    }

    /// Fetches one reading per kind for `scope`.
    pub async fn collect(&self, kinds: &[IndicatorKind], scope: &Scope) -> Collection {
        let as_of = UtcDateTime::now();
        let mut collection = Collection::default();

        for &kind in kinds {
            let request = FetchRequest::new(kind, scope.clone());
            let reading = match self.fetch(request).await {
                Ok(SourcePayload::Measurement(measurement)) if measurement.kind() == kind => {
                    IndicatorReading::present(measurement, as_of)
                }
                Ok(SourcePayload::Measurement(measurement)) => {
                    let warning = format!(
                        "source returned a {} measurement for indicator '{kind}'",
                        measurement.kind()
                    );
                    absent(&mut collection, kind, as_of, warning)
                }
                Ok(SourcePayload::Texts(texts)) if kind == IndicatorKind::TextSentiment => {
                    let summary = self.combiner.score_batch(&texts);
                    if summary.is_none() {
                        let warning =
                            format!("no scorable texts among {} item(s) for {scope}", texts.len());
                        collection.warnings.push(warning);
                    }
                    let reading = TextBatchSummary::reading_for(summary.as_ref(), as_of);
                    collection.text_summary = summary;
                    reading
                }
                Ok(SourcePayload::Texts(_)) => {
                    let warning = format!("source returned texts for indicator '{kind}'");
                    absent(&mut collection, kind, as_of, warning)
                }
                Err(error) => {
                    let warning = format!("indicator '{kind}' unavailable for {scope}: {error}");
                    absent(&mut collection, kind, as_of, warning)
                }
            };
            collection.readings.push(reading);
        }

        debug!(
            %scope,
            requested = kinds.len(),
            absent = collection.absent_kinds().count(),
            "collected readings"
        );

        collection
    }

    async fn fetch(&self, request: FetchRequest) -> Result<SourcePayload, SourceError> {
        let id = SourceId::for_kind(request.kind);
        let entry = self
            .sources
            .get(&id)
            .ok_or_else(|| SourceError::not_registered(request.kind))?;

        let mut retries = 0;
        loop {
            if !entry.breaker.allow_request() {
                return Err(SourceError::unavailable(format!(
                    "circuit open for source '{id}'"
                )));
            }

            match entry.queue.acquire() {
                Ok(()) => {}
                Err(Throttle::QuotaExhausted) => return Err(SourceError::quota_exhausted(id)),
                Err(Throttle::RetryAfter(wait)) if wait <= self.max_wait => {
                    let wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
                    debug!(source = %id, wait_ms, "waiting for call slot");
                    tokio::time::sleep(wait).await;
                    continue;
                }
                Err(Throttle::RetryAfter(wait)) => {
                    return Err(SourceError::rate_limited(format!(
                        "source '{id}' is throttled for another {}ms",
                        wait.as_millis()
                    )));
                }
            }

            match entry.source.fetch(request.clone()).await {
                Ok(payload) => {
                    entry.breaker.record_success();
                    return Ok(payload);
                }
                Err(error) => {
                    entry.breaker.record_failure();
                    let delay = error
                        .retryable()
                        .then(|| entry.queue.retry_delay(retries))
                        .flatten();
                    let Some(delay) = delay else {
                        return Err(error);
                    };

                    retries += 1;
                    debug!(
                        source = %id,
                        kind = %request.kind,
                        retry = retries,
                        code = error.code(),
                        "retrying source after failure"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

fn absent(
    collection: &mut Collection,
    kind: IndicatorKind,
    as_of: UtcDateTime,
    warning: String,
) -> IndicatorReading {
    warn!(kind = %kind, "{warning}");
    collection.warnings.push(warning);
    IndicatorReading::absent(kind, as_of)
}

impl std::fmt::Debug for ReadingCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadingCollector")
            .field("sources", &self.registered())
            .field("combiner", &self.combiner)
            .field("max_wait", &self.max_wait)
            .finish()
    }
}
