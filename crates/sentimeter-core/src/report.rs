use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CompositeResult, MalformedReading, Symbol, TextBatchSummary, UtcDateTime, ValidationError,
};

/// Schema version stamped on every report this crate assembles.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Structured result handed to presentation and storage collaborators.
///
/// Pure data: formatting (percentages, prose) belongs to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub meta: ReportMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<CompositeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<InstrumentSection>,
    /// Readings dropped for carrying non-finite values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<MalformedReading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SentimentReport {
    pub fn new(
        meta: ReportMeta,
        market: Option<CompositeResult>,
        instrument: Option<InstrumentSection>,
    ) -> Result<Self, ValidationError> {
        let report = Self {
            meta,
            market,
            instrument,
            excluded: Vec::new(),
            warnings: Vec::new(),
        };
        report.validate()?;
        Ok(report)
    }

    pub fn market(meta: ReportMeta, composite: CompositeResult) -> Self {
        Self {
            meta,
            market: Some(composite),
            instrument: None,
            excluded: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn instrument(meta: ReportMeta, section: InstrumentSection) -> Self {
        Self {
            meta,
            market: None,
            instrument: Some(section),
            excluded: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_excluded(mut self, excluded: Vec<MalformedReading>) -> Self {
        self.excluded.extend(excluded);
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.meta.validate_schema_compliance()?;

        if self.market.is_none() && self.instrument.is_none() {
            return Err(ValidationError::EmptyReport);
        }

        Ok(())
    }

    /// Composites in the report, market first.
    pub fn composites(&self) -> impl Iterator<Item = &CompositeResult> {
        self.market
            .iter()
            .chain(self.instrument.iter().map(|section| &section.composite))
    }
}

/// Instrument-level composite plus the text batch behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSection {
    pub symbol: Symbol,
    pub composite: CompositeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_summary: Option<TextBatchSummary>,
}

/// Metadata attached to every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub report_id: String,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
}

impl ReportMeta {
    pub fn new(
        report_id: impl Into<String>,
        schema_version: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let meta = Self {
            report_id: report_id.into(),
            schema_version: schema_version.into(),
            generated_at: UtcDateTime::now(),
        };
        meta.validate_schema_compliance()?;
        Ok(meta)
    }

    /// Fresh UUID v4 report id at the current schema version.
    pub fn generate() -> Self {
        Self {
            report_id: Uuid::new_v4().to_string(),
            schema_version: SCHEMA_VERSION.to_owned(),
            generated_at: UtcDateTime::now(),
        }
    }

    pub fn with_generated_at(mut self, generated_at: UtcDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn validate_schema_compliance(&self) -> Result<(), ValidationError> {
        if self.report_id.trim().len() < 8 {
            return Err(ValidationError::InvalidReportId);
        }

        if !is_valid_schema_version(&self.schema_version) {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }

        Ok(())
    }
}

fn is_valid_schema_version(value: &str) -> bool {
    let Some(version) = value.strip_prefix('v') else {
        return false;
    };

    let mut parts = version.split('.');
    let major = parts.next();
    let minor = parts.next();
    let patch = parts.next();

    if parts.next().is_some() {
        return false;
    }

    [major, minor, patch].iter().all(|part| {
        part.is_some_and(|segment| {
            !segment.is_empty() && segment.chars().all(|ch| ch.is_ascii_digit())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Aggregator;

    #[test]
    fn generated_meta_is_valid() {
        let meta = ReportMeta::generate();
        meta.validate_schema_compliance().expect("generated meta is valid");
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert!(Uuid::parse_str(&meta.report_id).is_ok());
    }

    #[test]
    fn rejects_bad_schema_version() {
        let err = ReportMeta::new("report-12345", "1.0").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSchemaVersion { .. }));
    }

    #[test]
    fn rejects_short_report_id() {
        let err = ReportMeta::new("abc", "v1.0.0").expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidReportId);
    }

    #[test]
    fn report_requires_a_composite() {
        let err = SentimentReport::new(ReportMeta::generate(), None, None).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyReport);
    }

    #[test]
    fn lists_market_then_instrument_composites() {
        let market = Aggregator::market().aggregate(&[]);
        let section = InstrumentSection {
            symbol: Symbol::parse("AAPL").expect("valid symbol"),
            composite: Aggregator::instrument().aggregate(&[]),
            text_summary: None,
        };

        let report = SentimentReport::new(ReportMeta::generate(), Some(market), Some(section))
            .expect("valid report");
        assert_eq!(report.composites().count(), 2);
    }

    #[test]
    fn omits_empty_sections_when_serialized() {
        let composite = Aggregator::market().aggregate(&[]);
        let report = SentimentReport::market(ReportMeta::generate(), composite);
        let json = serde_json::to_value(&report).expect("serialize");

        assert!(json.get("market").is_some());
        assert!(json.get("instrument").is_none());
        assert!(json.get("excluded").is_none());
        assert!(json.get("warnings").is_none());
    }
}
