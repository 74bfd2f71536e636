//! # Text Sentiment
//!
//! Two independent polarity estimators score the same text; the combiner
//! merges them into one TEXT_SENTIMENT contribution.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PolarityEstimator`] | Capability: text in, polarity in `[-1, 1]` out |
//! | [`LexiconEstimator`] | General-purpose financial word list |
//! | [`VaderEstimator`] | Social-text tuned VADER compound score |
//! | [`TextSentimentCombiner`] | Weighted merge, agreement-based confidence |
//! | [`TextBatchSummary`] | Aggregate over a batch, fed to the aggregator |
//!
//! ```rust
//! use sentimeter_core::{IndicatorBands, TextSentimentCombiner};
//! use sentimeter_core::labels::TextLabel;
//!
//! let bands = IndicatorBands::standard().text;
//! let combined = TextSentimentCombiner::combine_with(&bands, 0.4, 0.6);
//! assert!((combined.score - 0.52).abs() < 1e-12);
//! assert!((combined.confidence - 0.9).abs() < 1e-12);
//! assert_eq!(combined.label, TextLabel::VeryPositive);
//! ```

mod lexicon;
mod vader;

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::band::BandTable;
use crate::labels::TextLabel;
use crate::{IndicatorKind, IndicatorReading, RawMeasurement, UtcDateTime};

pub use lexicon::LexiconEstimator;
pub use vader::VaderEstimator;

const GENERAL_WEIGHT: f64 = 0.4;
const SOCIAL_WEIGHT: f64 = 0.6;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("url pattern compiles"));
static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("mention pattern compiles"));

/// Black-box polarity scorer.
pub trait PolarityEstimator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Polarity of `text` in `[-1, 1]`.
    fn estimate(&self, text: &str) -> f64;
}

/// Strips URLs, `@mentions` and hashtag markers, then collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_PATTERN.replace_all(text, " ");
    let without_mentions = MENTION_PATTERN.replace_all(&without_urls, " ");
    without_mentions
        .replace('#', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Combined polarity of one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextScore {
    pub score: f64,
    pub confidence: f64,
    pub label: TextLabel,
}

/// Per-batch aggregate. Only `mean_score` feeds the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBatchSummary {
    pub total: usize,
    pub mean_score: f64,
    pub mean_confidence: f64,
    pub label: TextLabel,
    pub label_counts: BTreeMap<TextLabel, usize>,
}

impl TextBatchSummary {
    /// Averages `scores` and labels the mean with `bands`.
    pub fn from_scores(scores: &[TextScore], bands: &BandTable<TextLabel>) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let total = scores.len();
        let mean_score = scores.iter().map(|item| item.score).sum::<f64>() / total as f64;
        let mean_confidence =
            scores.iter().map(|item| item.confidence).sum::<f64>() / total as f64;

        let mut label_counts = BTreeMap::new();
        for item in scores {
            *label_counts.entry(item.label).or_insert(0) += 1;
        }

        Some(Self {
            total,
            mean_score,
            mean_confidence,
            label: bands.classify(mean_score),
            label_counts,
        })
    }

    pub fn count(&self, label: TextLabel) -> usize {
        self.label_counts.get(&label).copied().unwrap_or(0)
    }

    pub fn to_reading(&self, as_of: UtcDateTime) -> IndicatorReading {
        IndicatorReading::present(
            RawMeasurement::TextSentiment {
                mean_polarity: self.mean_score,
            },
            as_of,
        )
    }

    /// TEXT_SENTIMENT reading for an optional summary; `None` is absent.
    pub fn reading_for(summary: Option<&Self>, as_of: UtcDateTime) -> IndicatorReading {
        match summary {
            Some(summary) => summary.to_reading(as_of),
            None => IndicatorReading::absent(IndicatorKind::TextSentiment, as_of),
        }
    }
}

/// Merges a general-purpose and a social-text estimator.
///
/// Labels come from the combiner's TEXT_SENTIMENT band table, which should be
/// the engine's configured table so summaries and unit scores agree.
#[derive(Clone)]
pub struct TextSentimentCombiner {
    general: Arc<dyn PolarityEstimator>,
    social: Arc<dyn PolarityEstimator>,
    bands: BandTable<TextLabel>,
}

impl TextSentimentCombiner {
    /// Combiner labelling with the standard text bands.
    pub fn new(general: Arc<dyn PolarityEstimator>, social: Arc<dyn PolarityEstimator>) -> Self {
        Self {
            general,
            social,
            bands: crate::normalizer::text_bands(),
        }
    }

    /// [`LexiconEstimator`] as the general estimator, [`VaderEstimator`] as the social one.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(LexiconEstimator::new()),
            Arc::new(VaderEstimator::new()),
        )
    }

    /// Replaces the band table used for every label this combiner emits.
    pub fn with_bands(mut self, bands: BandTable<TextLabel>) -> Self {
        self.bands = bands;
        self
    }

    pub fn bands(&self) -> &BandTable<TextLabel> {
        &self.bands
    }

    /// Combines two polarities, labelling with this combiner's bands.
    pub fn combine(&self, general: f64, social: f64) -> TextScore {
        Self::combine_with(&self.bands, general, social)
    }

    /// `0.4 * general + 0.6 * social`; confidence `1 - |general - social| / 2`.
    ///
    /// Confidence is reported only, it never re-weights the score.
    pub fn combine_with(bands: &BandTable<TextLabel>, general: f64, social: f64) -> TextScore {
        let general = sanitize(general);
        let social = sanitize(social);

        let score = (GENERAL_WEIGHT * general + SOCIAL_WEIGHT * social).clamp(-1.0, 1.0);
        let confidence = (1.0 - (general - social).abs() / 2.0).clamp(0.0, 1.0);

        TextScore {
            score,
            confidence,
            label: bands.classify(score),
        }
    }

    /// Scores one text, or `None` when nothing is left after cleaning.
    pub fn score_text(&self, text: &str) -> Option<TextScore> {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return None;
        }

        let general = self.general.estimate(&cleaned);
        let social = self.social.estimate(&cleaned);
        Some(self.combine(general, social))
    }

    /// Scores every text independently and summarizes the batch.
    ///
    /// Returns `None` when no text could be scored, including an empty batch.
    pub fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Option<TextBatchSummary> {
        let scores: Vec<TextScore> = texts
            .iter()
            .filter_map(|text| self.score_text(text.as_ref()))
            .collect();

        debug!(
            general = self.general.name(),
            social = self.social.name(),
            submitted = texts.len(),
            scored = scores.len(),
            "scored text batch"
        );

        TextBatchSummary::from_scores(&scores, &self.bands)
    }
}

impl Default for TextSentimentCombiner {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for TextSentimentCombiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSentimentCombiner")
            .field("general", &self.general.name())
            .field("social", &self.social.name())
            .field("bands", &self.bands.bands().len())
            .finish()
    }
}

fn sanitize(polarity: f64) -> f64 {
    if polarity.is_finite() {
        polarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl PolarityEstimator for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn estimate(&self, _text: &str) -> f64 {
            self.0
        }
    }

    fn combiner(general: f64, social: f64) -> TextSentimentCombiner {
        TextSentimentCombiner::new(Arc::new(Fixed(general)), Arc::new(Fixed(social)))
    }

    fn standard_bands() -> BandTable<TextLabel> {
        crate::normalizer::text_bands()
    }

    #[test]
    fn combines_with_social_weighted_higher() {
        let combined = TextSentimentCombiner::combine_with(&standard_bands(), 0.4, 0.6);
        assert!((combined.score - 0.52).abs() < 1e-12);
        assert!((combined.confidence - 0.9).abs() < 1e-12);
        assert_eq!(combined.label, TextLabel::VeryPositive);
    }

    #[test]
    fn full_disagreement_has_zero_confidence() {
        let combined = TextSentimentCombiner::combine_with(&standard_bands(), -1.0, 1.0);
        assert!((combined.score - 0.2).abs() < 1e-12);
        assert_eq!(combined.confidence, 0.0);
        assert_eq!(combined.label, TextLabel::Positive);
    }

    #[test]
    fn agreement_has_full_confidence() {
        let combined = TextSentimentCombiner::combine_with(&standard_bands(), -0.8, -0.8);
        assert_eq!(combined.confidence, 1.0);
        assert_eq!(combined.label, TextLabel::VeryNegative);
    }

    #[test]
    fn out_of_range_polarities_are_clamped_first() {
        let combined = TextSentimentCombiner::combine_with(&standard_bands(), 3.0, f64::NAN);
        assert!((combined.score - 0.4).abs() < 1e-12);
        assert_eq!(combined.confidence, 0.5);
    }

    #[test]
    fn custom_bands_label_scores_and_summaries() {
        use crate::band::{Band, Edge};

        let wide_neutral = BandTable::new(
            vec![
                Band::new(Edge::Unbounded, Edge::Exclusive(-0.9), TextLabel::VeryNegative),
                Band::new(Edge::Inclusive(-0.9), Edge::Exclusive(0.9), TextLabel::Neutral),
                Band::new(Edge::Inclusive(0.9), Edge::Unbounded, TextLabel::VeryPositive),
            ],
            TextLabel::Neutral,
        )
        .expect("valid bands");
        let combiner = combiner(0.4, 0.6).with_bands(wide_neutral);

        assert_eq!(combiner.combine(0.4, 0.6).label, TextLabel::Neutral);
        let summary = combiner.score_batch(&["steady"]).expect("scored batch");
        assert_eq!(summary.label, TextLabel::Neutral);
        assert_eq!(summary.count(TextLabel::Neutral), 1);
    }

    #[test]
    fn text_label_boundaries() {
        let bands = crate::normalizer::text_bands();
        assert_eq!(bands.classify(0.5), TextLabel::Positive);
        assert_eq!(bands.classify(0.05), TextLabel::Positive);
        assert_eq!(bands.classify(0.049), TextLabel::Neutral);
        assert_eq!(bands.classify(-0.05), TextLabel::Negative);
        assert_eq!(bands.classify(-0.5), TextLabel::VeryNegative);
    }

    #[test]
    fn cleaning_strips_links_mentions_and_hashes() {
        assert_eq!(
            clean_text("  @trader check https://t.co/abc   #AAPL   to the moon "),
            "check AAPL to the moon"
        );
        assert_eq!(clean_text("@someone https://example.com"), "");
    }

    #[test]
    fn batch_summary_counts_labels_and_averages() {
        let summary = combiner(0.4, 0.6)
            .score_batch(&["first", "second", "third"])
            .expect("scored batch");

        assert_eq!(summary.total, 3);
        assert!((summary.mean_score - 0.52).abs() < 1e-12);
        assert!((summary.mean_confidence - 0.9).abs() < 1e-12);
        assert_eq!(summary.count(TextLabel::VeryPositive), 3);
        assert_eq!(summary.count(TextLabel::Neutral), 0);
    }

    #[test]
    fn empty_batch_yields_absent_reading() {
        let as_of = UtcDateTime::parse("2024-11-08T21:00:00Z").expect("valid timestamp");
        let texts: [&str; 0] = [];
        let summary = combiner(0.4, 0.6).score_batch(&texts);
        assert!(summary.is_none());

        let reading = TextBatchSummary::reading_for(summary.as_ref(), as_of);
        assert_eq!(reading.kind(), IndicatorKind::TextSentiment);
        assert!(!reading.is_present());
    }

    #[test]
    fn texts_empty_after_cleaning_are_skipped() {
        let summary = combiner(-0.2, -0.2)
            .score_batch(&["@only_a_mention", "real words here"])
            .expect("one text scored");
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn summary_becomes_text_sentiment_reading() {
        let as_of = UtcDateTime::parse("2024-11-08T21:00:00Z").expect("valid timestamp");
        let summary = combiner(-1.0, -1.0)
            .score_batch(&["sell everything"])
            .expect("scored batch");

        let reading = summary.to_reading(as_of);
        assert_eq!(
            reading.measurement(),
            Some(&RawMeasurement::TextSentiment {
                mean_polarity: -1.0
            })
        );
    }
}
