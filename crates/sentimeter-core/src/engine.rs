use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Aggregator, CompositeResult, EngineConfig, IndicatorKind, IndicatorReading, InstrumentSection,
    MalformedReading, Normalizer, ReportMeta, SentimentReport, Symbol, TextBatchSummary,
    TextSentimentCombiner, UnitScore,
};

/// Outcome of normalizing a batch of readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredReadings {
    pub scores: Vec<UnitScore>,
    /// Kinds whose reading was absent or carried no signal.
    pub absent: BTreeSet<IndicatorKind>,
    /// Readings excluded for non-finite values.
    pub excluded: Vec<MalformedReading>,
}

/// A composite plus the readings excluded while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub composite: CompositeResult,
    pub excluded: Vec<MalformedReading>,
}

/// Entry point to the aggregation core.
///
/// Holds only read-only tables; every method is a pure function of its
/// arguments, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct SentimentEngine {
    config: EngineConfig,
    normalizer: Normalizer,
    market: Aggregator,
    instrument: Aggregator,
}

impl SentimentEngine {
    pub fn new(config: EngineConfig) -> Self {
        let normalizer = Normalizer::new(config.indicator_bands.clone());
        let market = Aggregator::new(config.market_weights.clone(), config.market_bands.clone());
        let instrument = Aggregator::new(
            config.instrument_weights.clone(),
            config.instrument_bands.clone(),
        );

        Self {
            config,
            normalizer,
            market,
            instrument,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Standard text estimators labelling with the configured TEXT_SENTIMENT bands.
    pub fn text_combiner(&self) -> TextSentimentCombiner {
        TextSentimentCombiner::standard().with_bands(self.config.indicator_bands.text.clone())
    }

    /// Normalizes every reading. Malformed readings are excluded and logged,
    /// never propagated.
    pub fn score_readings(&self, readings: &[IndicatorReading]) -> ScoredReadings {
        let mut scored = ScoredReadings::default();

        for reading in readings {
            match self.normalizer.normalize(reading) {
                Ok(Some(score)) => scored.scores.push(score),
                Ok(None) => {
                    scored.absent.insert(reading.kind());
                }
                Err(malformed) => {
                    warn!(
                        kind = %malformed.kind,
                        field = %malformed.field,
                        "excluding malformed reading"
                    );
                    scored.excluded.push(malformed);
                }
            }
        }

        debug!(
            readings = readings.len(),
            scored = scored.scores.len(),
            absent = scored.absent.len(),
            excluded = scored.excluded.len(),
            "normalized readings"
        );

        scored
    }

    pub fn market_composite(&self, readings: &[IndicatorReading]) -> Assessment {
        let scored = self.score_readings(readings);
        Assessment {
            composite: self.market.aggregate(&scored.scores),
            excluded: scored.excluded,
        }
    }

    pub fn instrument_composite(&self, readings: &[IndicatorReading]) -> Assessment {
        let scored = self.score_readings(readings);
        Assessment {
            composite: self.instrument.aggregate(&scored.scores),
            excluded: scored.excluded,
        }
    }

    pub fn market_report(&self, readings: &[IndicatorReading]) -> SentimentReport {
        self.market_report_with(ReportMeta::generate(), readings)
    }

    /// Like [`Self::market_report`] with caller-supplied metadata, so equal
    /// inputs yield equal reports.
    pub fn market_report_with(
        &self,
        meta: ReportMeta,
        readings: &[IndicatorReading],
    ) -> SentimentReport {
        let assessment = self.market_composite(readings);
        SentimentReport::market(meta, assessment.composite).with_excluded(assessment.excluded)
    }

    pub fn instrument_report(
        &self,
        symbol: Symbol,
        readings: &[IndicatorReading],
        text_summary: Option<TextBatchSummary>,
    ) -> SentimentReport {
        self.instrument_report_with(ReportMeta::generate(), symbol, readings, text_summary)
    }

    pub fn instrument_report_with(
        &self,
        meta: ReportMeta,
        symbol: Symbol,
        readings: &[IndicatorReading],
        text_summary: Option<TextBatchSummary>,
    ) -> SentimentReport {
        let assessment = self.instrument_composite(readings);
        let section = InstrumentSection {
            symbol,
            composite: assessment.composite,
            text_summary,
        };
        SentimentReport::instrument(meta, section).with_excluded(assessment.excluded)
    }
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
