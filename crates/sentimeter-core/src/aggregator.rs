//! Availability-aware weighted aggregation of unit scores.
//!
//! The composite is `Σ(weight·score) / Σ(weight)` over the indicators that
//! are present, so an absent indicator never drags the result toward zero.
//! With nothing present the result is the indeterminate composite: score
//! `0.0`, label `NEUTRAL`, every table kind listed as missing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::band::{Band, BandTable, Edge};
use crate::labels::CompositeLabel;
use crate::{IndicatorKind, UnitScore, WeightTable};

/// Band set used to classify a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeBands(BandTable<CompositeLabel>);

impl CompositeBands {
    /// Five bands. `0.4` is BULLISH but `-0.4` is SLIGHTLY_BEARISH, and both
    /// `±0.1` sit in the SLIGHTLY bands.
    pub fn five_band() -> Self {
        let table = BandTable::new(
            vec![
                Band::new(Edge::Unbounded, Edge::Exclusive(-0.4), CompositeLabel::Bearish),
                Band::new(
                    Edge::Inclusive(-0.4),
                    Edge::Inclusive(-0.1),
                    CompositeLabel::SlightlyBearish,
                ),
                Band::new(Edge::Exclusive(-0.1), Edge::Exclusive(0.1), CompositeLabel::Neutral),
                Band::new(
                    Edge::Inclusive(0.1),
                    Edge::Exclusive(0.4),
                    CompositeLabel::SlightlyBullish,
                ),
                Band::new(Edge::Inclusive(0.4), Edge::Unbounded, CompositeLabel::Bullish),
            ],
            CompositeLabel::Neutral,
        )
        .expect("five-band composite table is contiguous");
        Self(table)
    }

    /// Market-only variant with a single neutral dead zone.
    pub fn three_band() -> Self {
        let table = BandTable::new(
            vec![
                Band::new(Edge::Unbounded, Edge::Inclusive(-0.1), CompositeLabel::Bearish),
                Band::new(Edge::Exclusive(-0.1), Edge::Exclusive(0.1), CompositeLabel::Neutral),
                Band::new(Edge::Inclusive(0.1), Edge::Unbounded, CompositeLabel::Bullish),
            ],
            CompositeLabel::Neutral,
        )
        .expect("three-band composite table is contiguous");
        Self(table)
    }

    pub fn from_table(table: BandTable<CompositeLabel>) -> Self {
        Self(table)
    }

    pub fn classify(&self, score: f64) -> CompositeLabel {
        self.0.classify(score)
    }

    pub fn table(&self) -> &BandTable<CompositeLabel> {
        &self.0
    }
}

impl Default for CompositeBands {
    fn default() -> Self {
        Self::five_band()
    }
}

/// One present indicator's share of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub kind: IndicatorKind,
    /// Renormalized weight; the weights of all contributions sum to one.
    pub weight_used: f64,
    pub unit_score: UnitScore,
}

/// Output of one aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub score: f64,
    pub label: CompositeLabel,
    /// Present indicators, in weight-table order.
    pub contributions: Vec<Contribution>,
    /// Weight-table kinds that had no unit score.
    pub missing: BTreeSet<IndicatorKind>,
    indeterminate: bool,
}

impl CompositeResult {
    fn indeterminate(
        contributions: Vec<Contribution>,
        missing: BTreeSet<IndicatorKind>,
    ) -> Self {
        Self {
            score: 0.0,
            label: CompositeLabel::Neutral,
            contributions,
            missing,
            indeterminate: true,
        }
    }

    /// True when no weighted indicator was available, as opposed to a
    /// neutral score from mixed signals.
    pub const fn is_indeterminate(&self) -> bool {
        self.indeterminate
    }

    pub fn contribution(&self, kind: IndicatorKind) -> Option<&Contribution> {
        self.contributions.iter().find(|item| item.kind == kind)
    }
}

/// Combines unit scores under one weight table and one composite band set.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weights: WeightTable,
    bands: CompositeBands,
}

impl Aggregator {
    pub fn new(weights: WeightTable, bands: CompositeBands) -> Self {
        Self { weights, bands }
    }

    pub fn market() -> Self {
        Self::new(WeightTable::market(), CompositeBands::five_band())
    }

    pub fn instrument() -> Self {
        Self::new(WeightTable::instrument(), CompositeBands::five_band())
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn bands(&self) -> &CompositeBands {
        &self.bands
    }

    /// Aggregates the present unit scores.
    ///
    /// Scores for kinds outside the weight table are ignored, as is any score
    /// after the first for a given kind.
    pub fn aggregate(&self, scores: &[UnitScore]) -> CompositeResult {
        for (index, score) in scores.iter().enumerate() {
            let kind = score.kind();
            if !self.weights.contains(kind) {
                debug!(kind = %kind, "unit score has no weight in the active table, ignoring");
            } else if scores[..index].iter().any(|seen| seen.kind() == kind) {
                warn!(kind = %kind, "duplicate unit score, keeping the first");
            }
        }

        let mut present = Vec::new();
        let mut missing = BTreeSet::new();
        for entry in self.weights.entries() {
            match scores.iter().find(|score| score.kind() == entry.kind) {
                Some(score) => present.push((entry.weight, *score)),
                None => {
                    missing.insert(entry.kind);
                }
            }
        }

        let total_weight: f64 = present.iter().map(|(weight, _)| weight).sum();
        if total_weight <= 0.0 {
            debug!(
                present = present.len(),
                missing = missing.len(),
                "no weighted indicator present, composite is indeterminate"
            );
            let contributions = present
                .into_iter()
                .map(|(_, unit_score)| Contribution {
                    kind: unit_score.kind(),
                    weight_used: 0.0,
                    unit_score,
                })
                .collect();
            return CompositeResult::indeterminate(contributions, missing);
        }

        let weighted_sum: f64 = present
            .iter()
            .map(|(weight, unit_score)| weight * unit_score.score())
            .sum();
        let score = (weighted_sum / total_weight).clamp(-1.0, 1.0);
        let label = self.bands.classify(score);

        let contributions = present
            .into_iter()
            .map(|(weight, unit_score)| Contribution {
                kind: unit_score.kind(),
                weight_used: weight / total_weight,
                unit_score,
            })
            .collect::<Vec<_>>();

        debug!(
            score,
            label = %label,
            present = contributions.len(),
            missing = missing.len(),
            "composite computed"
        );

        CompositeResult {
            score,
            label,
            contributions,
            missing,
            indeterminate: false,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::market()
    }
}
