//! General-purpose, rule-based polarity from a financial word list.

use std::collections::HashMap;

use super::PolarityEstimator;

const POSITIVE_TERMS: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("surges", 0.7),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("soar", 0.8),
    ("soars", 0.8),
    ("gain", 0.5),
    ("gains", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("rises", 0.5),
    ("improve", 0.5),
    ("outperform", 0.7),
    ("beat", 0.6),
    ("beats", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("record", 0.6),
    ("upgrade", 0.6),
    ("buy", 0.5),
    ("breakout", 0.6),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("good", 0.5),
    ("great", 0.7),
];

const NEGATIVE_TERMS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("crashes", -0.9),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("decline", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("weak", -0.5),
    ("negative", -0.5),
    ("pessimistic", -0.6),
    ("concern", -0.5),
    ("fear", -0.6),
    ("uncertainty", -0.5),
    ("miss", -0.6),
    ("misses", -0.6),
    ("disappoint", -0.7),
    ("disappointing", -0.7),
    ("underperform", -0.6),
    ("downgrade", -0.6),
    ("sell", -0.5),
    ("dump", -0.7),
    ("crisis", -0.8),
    ("fraud", -0.9),
    ("bad", -0.5),
    ("terrible", -0.8),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "cannot", "cant", "don't", "dont", "doesn't", "doesnt", "didn't",
    "didnt", "won't", "wont", "isn't", "isnt", "aren't", "arent", "wasn't", "wasnt", "hardly",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("highly", 1.5),
    ("significantly", 1.5),
    ("dramatically", 1.8),
    ("massively", 1.8),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

/// Mean of matched term scores, with negation flipping and intensifiers
/// scaling the next sentiment term. Text with no matched term scores `0.0`.
#[derive(Debug, Clone)]
pub struct LexiconEstimator {
    terms: HashMap<String, f64>,
}

impl LexiconEstimator {
    pub fn new() -> Self {
        let terms = POSITIVE_TERMS
            .iter()
            .chain(NEGATIVE_TERMS)
            .map(|(word, score)| ((*word).to_owned(), *score))
            .collect();
        Self { terms }
    }

    /// Adds or replaces a term.
    pub fn with_term(mut self, word: &str, score: f64) -> Self {
        self.terms.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }
}

impl Default for LexiconEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityEstimator for LexiconEstimator {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn estimate(&self, text: &str) -> f64 {
        let mut matched = Vec::new();
        let mut negate_next = false;
        let mut multiplier = 1.0;

        for raw in text.split_whitespace() {
            let word = raw
                .trim_matches(|ch: char| !ch.is_alphanumeric() && ch != '\'')
                .to_lowercase();
            if word.is_empty() {
                continue;
            }

            if NEGATIONS.contains(&word.as_str()) {
                negate_next = true;
                continue;
            }

            if let Some((_, factor)) = INTENSIFIERS.iter().find(|(term, _)| *term == word) {
                multiplier = *factor;
                continue;
            }

            if let Some(score) = self.terms.get(&word) {
                let signed = if negate_next { -score } else { *score };
                matched.push(signed * multiplier);
            }
            negate_next = false;
            multiplier = 1.0;
        }

        if matched.is_empty() {
            return 0.0;
        }

        let mean = matched.iter().sum::<f64>() / matched.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_financial_terms() {
        let estimator = LexiconEstimator::new();
        assert!(estimator.estimate("Shares surge after strong earnings") > 0.5);
        assert!(estimator.estimate("Stock plunges on fraud probe") < -0.5);
    }

    #[test]
    fn unmatched_text_is_neutral() {
        assert_eq!(LexiconEstimator::new().estimate("the meeting is on tuesday"), 0.0);
    }

    #[test]
    fn negation_flips_next_term() {
        let estimator = LexiconEstimator::new();
        assert_eq!(estimator.estimate("not bullish"), -0.8);
        assert_eq!(estimator.estimate("bullish"), 0.8);
    }

    #[test]
    fn intensifier_scales_and_result_is_clamped() {
        let estimator = LexiconEstimator::new();
        assert_eq!(estimator.estimate("slightly weak"), -0.25);
        assert_eq!(estimator.estimate("extremely bullish"), 1.0);
    }

    #[test]
    fn ignores_surrounding_punctuation() {
        assert_eq!(LexiconEstimator::new().estimate("Bearish!!!"), -0.8);
    }

    #[test]
    fn custom_terms_extend_the_list() {
        let estimator = LexiconEstimator::new().with_term("Moon", 0.9);
        assert_eq!(estimator.estimate("to the moon"), 0.9);
    }
}
