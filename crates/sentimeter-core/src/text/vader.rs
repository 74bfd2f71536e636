use vader_sentiment::SentimentIntensityAnalyzer;

use super::PolarityEstimator;

/// Social-text tuned polarity: the VADER compound score.
pub struct VaderEstimator {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderEstimator {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VaderEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaderEstimator").finish_non_exhaustive()
    }
}

impl PolarityEstimator for VaderEstimator {
    fn name(&self) -> &'static str {
        "vader"
    }

    fn estimate(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn informal_text_gets_a_direction() {
        let estimator = VaderEstimator::new();
        assert!(estimator.estimate("This stock is AMAZING, love it!!!") > 0.5);
        assert!(estimator.estimate("Terrible quarter, awful guidance, hate it") < -0.5);
    }

    #[test]
    fn blank_text_is_neutral() {
        assert_eq!(VaderEstimator::new().estimate("   "), 0.0);
    }
}
