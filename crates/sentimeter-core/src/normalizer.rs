//! Per-indicator normalization onto the common `[-1, 1]` scale.
//!
//! | Kind | Unit score | Label source |
//! |------|------------|--------------|
//! | `VOLATILITY` | `clamp((20 - level) / 20)` | raw level bands |
//! | `PUT_CALL_RATIO` | `clamp((1 - ratio) / 0.8)` | raw ratio bands |
//! | `BREADTH` | `clamp(pct / 3) * (0.5 if volatility > 25)` | sign and volatility threshold |
//! | `ADVANCE_DECLINE` | `clamp(slope)` | score bands |
//! | `TEXT_SENTIMENT` | `clamp(mean_polarity)` | score bands |
//! | `INSIDER_ACTIVITY` | `(buys - sells) / (buys + sells)` | score bands |
//! | `INSTITUTIONAL_ACTIVITY` | `(increasing - decreasing) / holders` | score bands |
//!
//! Finite inputs outside the usual range are clamped, never rejected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::band::{Band, BandTable, Edge};
use crate::labels::{
    ActivityLabel, BreadthLabel, IndicatorLabel, PutCallLabel, TextLabel, TrendLabel,
    VolatilityLabel,
};
use crate::{IndicatorKind, IndicatorReading, MalformedReading, RawMeasurement};

const VOLATILITY_MIDPOINT: f64 = 20.0;
const VOLATILITY_SPAN: f64 = 20.0;
const PUT_CALL_NEUTRAL: f64 = 1.0;
const PUT_CALL_SPAN: f64 = 0.8;
const BREADTH_FULL_SCALE_PCT: f64 = 3.0;
const BREADTH_VOLATILITY_THRESHOLD: f64 = 25.0;
const NARROW_LEADERSHIP_PENALTY: f64 = 0.5;

/// One indicator's normalized contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnitScoreRecord")]
pub struct UnitScore {
    score: f64,
    label: IndicatorLabel,
}

impl UnitScore {
    /// Builds a unit score, clamping `score` into `[-1, 1]`.
    pub fn new(score: f64, label: IndicatorLabel) -> Result<Self, MalformedReading> {
        if !score.is_finite() {
            return Err(MalformedReading::new(label.kind(), "score"));
        }

        Ok(Self {
            score: score.clamp(-1.0, 1.0),
            label,
        })
    }

    pub const fn kind(&self) -> IndicatorKind {
        self.label.kind()
    }

    pub const fn score(&self) -> f64 {
        self.score
    }

    pub const fn label(&self) -> IndicatorLabel {
        self.label
    }
}

#[derive(Deserialize)]
struct UnitScoreRecord {
    score: f64,
    label: IndicatorLabel,
}

impl TryFrom<UnitScoreRecord> for UnitScore {
    type Error = MalformedReading;

    fn try_from(record: UnitScoreRecord) -> Result<Self, Self::Error> {
        Self::new(record.score, record.label)
    }
}

/// Band tables used to label individual indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorBands {
    /// Applied to the raw volatility level.
    pub volatility: BandTable<VolatilityLabel>,
    /// Applied to the raw put/call ratio.
    pub put_call: BandTable<PutCallLabel>,
    pub advance_decline: BandTable<TrendLabel>,
    pub text: BandTable<TextLabel>,
    pub insider: BandTable<ActivityLabel>,
    pub institutional: BandTable<ActivityLabel>,
}

impl IndicatorBands {
    pub fn standard() -> Self {
        Self {
            volatility: volatility_bands(),
            put_call: put_call_bands(),
            advance_decline: advance_decline_bands(),
            text: text_bands(),
            insider: activity_bands(0.2),
            institutional: activity_bands(0.3),
        }
    }
}

impl Default for IndicatorBands {
    fn default() -> Self {
        Self::standard()
    }
}

fn volatility_bands() -> BandTable<VolatilityLabel> {
    BandTable::new(
        vec![
            Band::new(Edge::Unbounded, Edge::Exclusive(15.0), VolatilityLabel::Complacent),
            Band::new(Edge::Inclusive(15.0), Edge::Exclusive(25.0), VolatilityLabel::Neutral),
            Band::new(Edge::Inclusive(25.0), Edge::Exclusive(35.0), VolatilityLabel::Fear),
            Band::new(Edge::Inclusive(35.0), Edge::Unbounded, VolatilityLabel::Panic),
        ],
        VolatilityLabel::Neutral,
    )
    .expect("volatility bands are contiguous")
}

fn put_call_bands() -> BandTable<PutCallLabel> {
    BandTable::new(
        vec![
            Band::new(Edge::Unbounded, Edge::Inclusive(0.7), PutCallLabel::Bullish),
            Band::new(Edge::Exclusive(0.7), Edge::Inclusive(1.0), PutCallLabel::Neutral),
            Band::new(Edge::Exclusive(1.0), Edge::Inclusive(1.5), PutCallLabel::Bearish),
            Band::new(Edge::Exclusive(1.5), Edge::Unbounded, PutCallLabel::ExtremeBearish),
        ],
        PutCallLabel::Neutral,
    )
    .expect("put/call bands are contiguous")
}

fn advance_decline_bands() -> BandTable<TrendLabel> {
    BandTable::new(
        vec![
            Band::new(Edge::Unbounded, Edge::Exclusive(-0.05), TrendLabel::Falling),
            Band::new(Edge::Inclusive(-0.05), Edge::Inclusive(0.05), TrendLabel::Flat),
            Band::new(Edge::Exclusive(0.05), Edge::Unbounded, TrendLabel::Rising),
        ],
        TrendLabel::Flat,
    )
    .expect("advance/decline bands are contiguous")
}

/// Text polarity bands. `-0.5` is VERY_NEGATIVE while `0.5` is only POSITIVE.
pub(crate) fn text_bands() -> BandTable<TextLabel> {
    BandTable::new(
        vec![
            Band::new(Edge::Unbounded, Edge::Inclusive(-0.5), TextLabel::VeryNegative),
            Band::new(Edge::Exclusive(-0.5), Edge::Inclusive(-0.05), TextLabel::Negative),
            Band::new(Edge::Exclusive(-0.05), Edge::Exclusive(0.05), TextLabel::Neutral),
            Band::new(Edge::Inclusive(0.05), Edge::Inclusive(0.5), TextLabel::Positive),
            Band::new(Edge::Exclusive(0.5), Edge::Unbounded, TextLabel::VeryPositive),
        ],
        TextLabel::Neutral,
    )
    .expect("text bands are contiguous")
}

fn activity_bands(threshold: f64) -> BandTable<ActivityLabel> {
    BandTable::new(
        vec![
            Band::new(Edge::Unbounded, Edge::Exclusive(-threshold), ActivityLabel::Bearish),
            Band::new(
                Edge::Inclusive(-threshold),
                Edge::Inclusive(threshold),
                ActivityLabel::Neutral,
            ),
            Band::new(Edge::Exclusive(threshold), Edge::Unbounded, ActivityLabel::Bullish),
        ],
        ActivityLabel::Neutral,
    )
    .expect("activity bands are contiguous")
}

/// Converts raw readings into unit scores.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    bands: IndicatorBands,
}

impl Normalizer {
    pub fn new(bands: IndicatorBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &IndicatorBands {
        &self.bands
    }

    /// Normalizes one reading.
    ///
    /// Returns `Ok(None)` when the reading is absent or carries no signal
    /// (zero transactions), and `Err` when a field is NaN or infinite.
    pub fn normalize(
        &self,
        reading: &IndicatorReading,
    ) -> Result<Option<UnitScore>, MalformedReading> {
        match reading.measurement() {
            Some(measurement) => self.normalize_measurement(measurement),
            None => Ok(None),
        }
    }

    pub fn normalize_measurement(
        &self,
        measurement: &RawMeasurement,
    ) -> Result<Option<UnitScore>, MalformedReading> {
        measurement.validate()?;

        let scored = match *measurement {
            RawMeasurement::Volatility { level } => Some(self.volatility(level)),
            RawMeasurement::PutCallRatio { ratio } => Some(self.put_call(ratio)),
            RawMeasurement::Breadth {
                price_change_pct,
                volatility,
            } => Some(breadth(price_change_pct, volatility)),
            RawMeasurement::AdvanceDecline { slope } => Some(self.advance_decline(slope)),
            RawMeasurement::TextSentiment { mean_polarity } => Some(self.text(mean_polarity)),
            RawMeasurement::InsiderActivity { buys, sells } => self.insider(buys, sells),
            RawMeasurement::InstitutionalActivity {
                increasing,
                decreasing,
                holders,
            } => self.institutional(increasing, decreasing, holders),
        };

        let Some((score, label)) = scored else {
            debug!(kind = %measurement.kind(), "no transactions, indicator carries no signal");
            return Ok(None);
        };

        UnitScore::new(score, label).map(Some)
    }

    fn volatility(&self, level: f64) -> (f64, IndicatorLabel) {
        let score = clamp_unit((VOLATILITY_MIDPOINT - level) / VOLATILITY_SPAN);
        let label = self.bands.volatility.classify(level);
        (score, IndicatorLabel::Volatility(label))
    }

    fn put_call(&self, ratio: f64) -> (f64, IndicatorLabel) {
        let score = clamp_unit((PUT_CALL_NEUTRAL - ratio) / PUT_CALL_SPAN);
        let label = self.bands.put_call.classify(ratio);
        (score, IndicatorLabel::PutCallRatio(label))
    }

    fn advance_decline(&self, slope: f64) -> (f64, IndicatorLabel) {
        let score = clamp_unit(slope);
        let label = self.bands.advance_decline.classify(score);
        (score, IndicatorLabel::AdvanceDecline(label))
    }

    fn text(&self, mean_polarity: f64) -> (f64, IndicatorLabel) {
        let score = clamp_unit(mean_polarity);
        let label = self.bands.text.classify(score);
        (score, IndicatorLabel::TextSentiment(label))
    }

    fn insider(&self, buys: u32, sells: u32) -> Option<(f64, IndicatorLabel)> {
        let total = u64::from(buys) + u64::from(sells);
        if total == 0 {
            return None;
        }

        let score = (f64::from(buys) - f64::from(sells)) / total as f64;
        let label = self.bands.insider.classify(score);
        Some((score, IndicatorLabel::InsiderActivity(label)))
    }

    fn institutional(
        &self,
        increasing: u32,
        decreasing: u32,
        holders: u32,
    ) -> Option<(f64, IndicatorLabel)> {
        let denominator = u64::from(holders).max(u64::from(increasing) + u64::from(decreasing));
        if denominator == 0 {
            return None;
        }

        let score = (f64::from(increasing) - f64::from(decreasing)) / denominator as f64;
        let label = self.bands.institutional.classify(score);
        Some((score, IndicatorLabel::InstitutionalActivity(label)))
    }
}

fn breadth(price_change_pct: f64, volatility: f64) -> (f64, IndicatorLabel) {
    let elevated = volatility > BREADTH_VOLATILITY_THRESHOLD;
    let penalty = if elevated { NARROW_LEADERSHIP_PENALTY } else { 1.0 };
    let score = clamp_unit(price_change_pct / BREADTH_FULL_SCALE_PCT) * penalty;

    let label = if price_change_pct > 0.0 && elevated {
        BreadthLabel::NarrowLeadership
    } else if price_change_pct > 0.0 {
        BreadthLabel::BroadStrength
    } else {
        BreadthLabel::BroadWeakness
    };

    (score, IndicatorLabel::Breadth(label))
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}
