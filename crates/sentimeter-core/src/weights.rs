//! Ordered, validated indicator weight tables for the composites.
//!
//! ```rust
//! use sentimeter_core::{IndicatorKind, WeightTable};
//!
//! let table = WeightTable::from_pairs([
//!     (IndicatorKind::Volatility, 0.6),
//!     (IndicatorKind::PutCallRatio, 0.4),
//! ])
//! .expect("valid weights");
//! assert_eq!(table.weight(IndicatorKind::PutCallRatio), Some(0.4));
//! assert!(!table.contains(IndicatorKind::Breadth));
//! ```

use serde::{Deserialize, Serialize};

use crate::{IndicatorKind, ValidationError};

/// One indicator's relative weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub kind: IndicatorKind,
    pub weight: f64,
}

/// Ordered, validated mapping from indicator kind to a non-negative weight.
///
/// Weights need not sum to one; the aggregator renormalizes over whatever is
/// present. Entry order is the order contributions are reported in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightEntry>", into = "Vec<WeightEntry>")]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
}

impl WeightTable {
    pub fn new(entries: Vec<WeightEntry>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::EmptyWeightTable);
        }

        for (index, entry) in entries.iter().enumerate() {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ValidationError::InvalidWeight { kind: entry.kind });
            }
            if entries[..index].iter().any(|seen| seen.kind == entry.kind) {
                return Err(ValidationError::DuplicateWeight { kind: entry.kind });
            }
        }

        Ok(Self { entries })
    }

    /// Builds a table from `(kind, weight)` pairs.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (IndicatorKind, f64)>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(kind, weight)| WeightEntry { kind, weight })
                .collect(),
        )
    }

    /// Broad-market composite weights.
    pub fn market() -> Self {
        Self::from_pairs([
            (IndicatorKind::Volatility, 0.30),
            (IndicatorKind::AdvanceDecline, 0.30),
            (IndicatorKind::PutCallRatio, 0.20),
            (IndicatorKind::Breadth, 0.20),
        ])
        .expect("market weights are valid")
    }

    /// Single-instrument composite weights.
    pub fn instrument() -> Self {
        Self::from_pairs([
            (IndicatorKind::TextSentiment, 0.50),
            (IndicatorKind::InsiderActivity, 0.25),
            (IndicatorKind::InstitutionalActivity, 0.25),
        ])
        .expect("instrument weights are valid")
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }

    pub fn weight(&self, kind: IndicatorKind) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.weight)
    }

    pub fn contains(&self, kind: IndicatorKind) -> bool {
        self.weight(kind).is_some()
    }
}

impl TryFrom<Vec<WeightEntry>> for WeightTable {
    type Error = ValidationError;

    fn try_from(entries: Vec<WeightEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<WeightTable> for Vec<WeightEntry> {
    fn from(table: WeightTable) -> Self {
        table.entries
    }
}
