use sentimeter_core::{IndicatorKind, SentimentEngine, SentimentReport, Symbol};
use tracing::info;

use crate::collector::ReadingCollector;
use crate::indicator_source::Scope;

/// Collects readings and runs them through the engine into a report.
#[derive(Debug)]
pub struct SentimentPipeline {
    collector: ReadingCollector,
    engine: SentimentEngine,
}

impl SentimentPipeline {
    /// The collector's text summaries are relabelled with the engine's
    /// TEXT_SENTIMENT bands so both agree.
    pub fn new(collector: ReadingCollector, engine: SentimentEngine) -> Self {
        let collector = collector.with_text_bands(engine.config().indicator_bands.text.clone());
        Self { collector, engine }
    }

    pub fn collector(&self) -> &ReadingCollector {
        &self.collector
    }

    pub fn engine(&self) -> &SentimentEngine {
        &self.engine
    }

    /// Broad-market report over the kinds in the market weight table.
    pub async fn analyze_market(&self) -> SentimentReport {
        let kinds = self
            .engine
            .config()
            .market_weights
            .kinds()
            .collect::<Vec<IndicatorKind>>();
        let collection = self.collector.collect(&kinds, &Scope::Market).await;

        let report = self
            .engine
            .market_report(&collection.readings)
            .with_warnings(collection.warnings);
        log_report("market", &report);
        report
    }

    /// Single-instrument report over the kinds in the instrument weight table.
    pub async fn analyze_instrument(&self, symbol: Symbol) -> SentimentReport {
        let kinds = self
            .engine
            .config()
            .instrument_weights
            .kinds()
            .collect::<Vec<IndicatorKind>>();
        let scope = Scope::Instrument(symbol.clone());
        let collection = self.collector.collect(&kinds, &scope).await;

        let report = self
            .engine
            .instrument_report(symbol, &collection.readings, collection.text_summary)
            .with_warnings(collection.warnings);
        log_report(scope.to_string().as_str(), &report);
        report
    }
}

fn log_report(scope: &str, report: &SentimentReport) {
    for composite in report.composites() {
        info!(
            scope,
            report_id = %report.meta.report_id,
            score = composite.score,
            label = %composite.label,
            missing = composite.missing.len(),
            warnings = report.warnings.len(),
            "sentiment report assembled"
        );
    }
}
