use serde::{Deserialize, Serialize};

use crate::{CompositeBands, CoreError, IndicatorBands, WeightTable};

/// Weight and band tables for one engine instance.
///
/// Every table validates on construction and on deserialization, so a
/// config that exists is usable. Omitted JSON fields fall back to the
/// documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub market_weights: WeightTable,
    pub instrument_weights: WeightTable,
    pub indicator_bands: IndicatorBands,
    pub market_bands: CompositeBands,
    pub instrument_bands: CompositeBands,
}

impl EngineConfig {
    pub fn from_json_str(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Classifies the market composite with the three-band variant.
    pub fn with_three_band_market(mut self) -> Self {
        self.market_bands = CompositeBands::three_band();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            market_weights: WeightTable::market(),
            instrument_weights: WeightTable::instrument(),
            indicator_bands: IndicatorBands::standard(),
            market_bands: CompositeBands::five_band(),
            instrument_bands: CompositeBands::five_band(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::CompositeLabel;
    use crate::IndicatorKind;

    #[test]
    fn empty_json_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").expect("valid config");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn overrides_one_table_and_keeps_the_rest() {
        let config = EngineConfig::from_json_str(
            r#"{"market_weights": [{"kind": "VOLATILITY", "weight": 1.0}]}"#,
        )
        .expect("valid config");

        assert_eq!(config.market_weights.entries().len(), 1);
        assert_eq!(config.instrument_weights, WeightTable::instrument());
        assert_eq!(
            config.market_weights.weight(IndicatorKind::Volatility),
            Some(1.0)
        );
    }

    #[test]
    fn rejects_invalid_weight_table() {
        let err = EngineConfig::from_json_str(r#"{"instrument_weights": []}"#)
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Serialization(_)));
        assert!(err.to_string().contains("at least one indicator"));
    }

    #[test]
    fn rejects_gapped_band_table() {
        let err = EngineConfig::from_json_str(
            r#"{"market_bands": {"bands": [
                {"lower": "unbounded", "upper": {"exclusive": 0.0}, "label": "BEARISH"},
                {"lower": {"exclusive": 0.0}, "upper": "unbounded", "label": "BULLISH"}
            ], "indeterminate": "NEUTRAL"}}"#,
        )
        .expect_err("must fail");
        assert!(err.to_string().contains("gap"));
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::default().with_three_band_market();
        let json = config.to_json_string().expect("serialize");
        let decoded = EngineConfig::from_json_str(&json).expect("deserialize");

        assert_eq!(decoded.market_bands.classify(0.1), CompositeLabel::Bullish);
        assert_eq!(decoded.market_weights, config.market_weights);
    }
}
