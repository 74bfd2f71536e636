//! Ordered, contiguous band tables mapping a continuous score to a label.
//!
//! Every band states whether each of its edges is inclusive, so tie placement
//! at a boundary is part of the table rather than an accident of comparison
//! order. Tables are validated once, when built or deserialized; a table that
//! exists is always ascending, gap-free and overlap-free.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::BandTableError;

/// One edge of a band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl Edge {
    const fn value(self) -> Option<f64> {
        match self {
            Self::Unbounded => None,
            Self::Inclusive(value) | Self::Exclusive(value) => Some(value),
        }
    }

    const fn is_inclusive(self) -> bool {
        matches!(self, Self::Inclusive(_))
    }
}

/// A labeled score range `lower..upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band<L> {
    pub lower: Edge,
    pub upper: Edge,
    pub label: L,
}

impl<L> Band<L> {
    pub const fn new(lower: Edge, upper: Edge, label: L) -> Self {
        Self {
            lower,
            upper,
            label,
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        let above_lower = match self.lower {
            Edge::Unbounded => true,
            Edge::Inclusive(bound) => score >= bound,
            Edge::Exclusive(bound) => score > bound,
        };
        let below_upper = match self.upper {
            Edge::Unbounded => true,
            Edge::Inclusive(bound) => score <= bound,
            Edge::Exclusive(bound) => score < bound,
        };
        above_lower && below_upper
    }
}

/// Validated band table plus the label returned when no band matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTable<L> {
    bands: Vec<Band<L>>,
    indeterminate: L,
}

impl<L: Copy> BandTable<L> {
    pub fn new(bands: Vec<Band<L>>, indeterminate: L) -> Result<Self, BandTableError> {
        validate_bands(&bands)?;
        Ok(Self {
            bands,
            indeterminate,
        })
    }

    /// Returns the label of the band containing `score`, or the indeterminate
    /// label when none does (NaN, or a score outside a bounded table).
    pub fn classify(&self, score: f64) -> L {
        self.bands
            .iter()
            .find(|band| band.contains(score))
            .map_or(self.indeterminate, |band| band.label)
    }

    pub fn bands(&self) -> &[Band<L>] {
        &self.bands
    }

    pub fn indeterminate(&self) -> L {
        self.indeterminate
    }
}

fn validate_bands<L>(bands: &[Band<L>]) -> Result<(), BandTableError> {
    if bands.is_empty() {
        return Err(BandTableError::Empty);
    }

    let last = bands.len() - 1;
    for (index, band) in bands.iter().enumerate() {
        let finite = [band.lower, band.upper]
            .iter()
            .filter_map(|edge| edge.value())
            .all(f64::is_finite);
        if !finite {
            return Err(BandTableError::NonFiniteEdge { index });
        }

        let interior_unbounded = (index > 0 && band.lower == Edge::Unbounded)
            || (index < last && band.upper == Edge::Unbounded);
        if interior_unbounded {
            return Err(BandTableError::InteriorUnbounded { index });
        }

        if let (Some(lower), Some(upper)) = (band.lower.value(), band.upper.value()) {
            let point_band = lower == upper && band.lower.is_inclusive() && band.upper.is_inclusive();
            if lower > upper || (lower == upper && !point_band) {
                return Err(BandTableError::EmptyBand { index });
            }
        }
    }

    for (index, pair) in bands.windows(2).enumerate() {
        let (upper, lower) = (pair[0].upper, pair[1].lower);
        let (Some(end), Some(start)) = (upper.value(), lower.value()) else {
            return Err(BandTableError::InteriorUnbounded { index });
        };

        if end < start {
            return Err(BandTableError::Gap { index });
        }
        if end > start {
            return Err(BandTableError::Overlap { index });
        }
        match (upper.is_inclusive(), lower.is_inclusive()) {
            (true, true) => return Err(BandTableError::Overlap { index }),
            (false, false) => return Err(BandTableError::Gap { index }),
            _ => {}
        }
    }

    Ok(())
}

impl<'de, L> Deserialize<'de> for BandTable<L>
where
    L: Deserialize<'de> + Copy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Record<L> {
            bands: Vec<Band<L>>,
            indeterminate: L,
        }

        let record = Record::<L>::deserialize(deserializer)?;
        Self::new(record.bands, record.indeterminate).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    enum Level {
        Low,
        Mid,
        High,
        Unknown,
    }

    fn three_levels() -> Vec<Band<Level>> {
        vec![
            Band::new(Edge::Unbounded, Edge::Exclusive(0.0), Level::Low),
            Band::new(Edge::Inclusive(0.0), Edge::Inclusive(1.0), Level::Mid),
            Band::new(Edge::Exclusive(1.0), Edge::Unbounded, Level::High),
        ]
    }

    #[test]
    fn classifies_with_declared_tie_placement() {
        let table = BandTable::new(three_levels(), Level::Unknown).expect("valid table");

        assert_eq!(table.classify(-0.01), Level::Low);
        assert_eq!(table.classify(0.0), Level::Mid);
        assert_eq!(table.classify(1.0), Level::Mid);
        assert_eq!(table.classify(1.000_001), Level::High);
    }

    #[test]
    fn nan_falls_through_to_indeterminate() {
        let table = BandTable::new(three_levels(), Level::Unknown).expect("valid table");
        assert_eq!(table.classify(f64::NAN), Level::Unknown);
    }

    #[test]
    fn bounded_table_reports_indeterminate_outside_its_range() {
        let table = BandTable::new(
            vec![Band::new(Edge::Inclusive(-1.0), Edge::Inclusive(1.0), Level::Mid)],
            Level::Unknown,
        )
        .expect("valid table");

        assert_eq!(table.classify(0.5), Level::Mid);
        assert_eq!(table.classify(1.5), Level::Unknown);
    }

    #[test]
    fn rejects_empty_table() {
        let err = BandTable::<Level>::new(Vec::new(), Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::Empty);
    }

    #[test]
    fn rejects_gap_between_exclusive_edges() {
        let mut bands = three_levels();
        bands[1].lower = Edge::Exclusive(0.0);
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::Gap { index: 0 });
    }

    #[test]
    fn rejects_gap_between_distinct_values() {
        let mut bands = three_levels();
        bands[2].lower = Edge::Exclusive(1.5);
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::Gap { index: 1 });
    }

    #[test]
    fn rejects_overlap_of_inclusive_edges() {
        let mut bands = three_levels();
        bands[0].upper = Edge::Inclusive(0.0);
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::Overlap { index: 0 });
    }

    #[test]
    fn rejects_descending_bands() {
        let bands = vec![
            Band::new(Edge::Inclusive(1.0), Edge::Unbounded, Level::High),
            Band::new(Edge::Unbounded, Edge::Exclusive(1.0), Level::Low),
        ];
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert!(matches!(err, BandTableError::InteriorUnbounded { .. }));
    }

    #[test]
    fn rejects_inverted_band() {
        let bands = vec![Band::new(Edge::Inclusive(2.0), Edge::Inclusive(1.0), Level::Mid)];
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::EmptyBand { index: 0 });
    }

    #[test]
    fn rejects_non_finite_edge() {
        let bands = vec![Band::new(
            Edge::Inclusive(f64::NEG_INFINITY),
            Edge::Unbounded,
            Level::Mid,
        )];
        let err = BandTable::new(bands, Level::Unknown).expect_err("must fail");
        assert_eq!(err, BandTableError::NonFiniteEdge { index: 0 });
    }

    #[test]
    fn deserialization_validates_the_table() {
        let valid = r#"{
            "bands": [
                {"lower": "unbounded", "upper": {"exclusive": 0.0}, "label": "Low"},
                {"lower": {"inclusive": 0.0}, "upper": "unbounded", "label": "High"}
            ],
            "indeterminate": "Unknown"
        }"#;
        let table: BandTable<Level> = serde_json::from_str(valid).expect("valid table");
        assert_eq!(table.classify(0.0), Level::High);

        let overlapping = valid.replace(r#"{"exclusive": 0.0}"#, r#"{"inclusive": 0.0}"#);
        let err = serde_json::from_str::<BandTable<Level>>(&overlapping).expect_err("must fail");
        assert!(err.to_string().contains("overlaps"));
    }
}
