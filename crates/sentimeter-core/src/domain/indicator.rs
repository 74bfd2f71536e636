use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MalformedReading, UtcDateTime, ValidationError};

/// Independently sourced indicator feeding a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Volatility,
    PutCallRatio,
    Breadth,
    AdvanceDecline,
    TextSentiment,
    InsiderActivity,
    InstitutionalActivity,
}

impl IndicatorKind {
    pub const ALL: [Self; 7] = [
        Self::Volatility,
        Self::PutCallRatio,
        Self::Breadth,
        Self::AdvanceDecline,
        Self::TextSentiment,
        Self::InsiderActivity,
        Self::InstitutionalActivity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volatility => "VOLATILITY",
            Self::PutCallRatio => "PUT_CALL_RATIO",
            Self::Breadth => "BREADTH",
            Self::AdvanceDecline => "ADVANCE_DECLINE",
            Self::TextSentiment => "TEXT_SENTIMENT",
            Self::InsiderActivity => "INSIDER_ACTIVITY",
            Self::InstitutionalActivity => "INSTITUTIONAL_ACTIVITY",
        }
    }
}

impl Display for IndicatorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownIndicator {
                value: value.to_owned(),
            })
    }
}

/// Raw, already-parsed measurement for one indicator. Units depend on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawMeasurement {
    /// Fear index level in index points (typically 10-80).
    Volatility { level: f64 },
    /// Put volume divided by call volume.
    PutCallRatio { ratio: f64 },
    /// Broad index percent change, observed alongside the volatility level.
    Breadth { price_change_pct: f64, volatility: f64 },
    /// Pre-normalized advance/decline trend slope; positive means rising breadth.
    AdvanceDecline { slope: f64 },
    /// Mean combined polarity of a text batch.
    TextSentiment { mean_polarity: f64 },
    /// Insider purchase and sale transaction counts in the lookback window.
    InsiderActivity { buys: u32, sells: u32 },
    /// Institutions that increased or decreased positions, out of all reported holders.
    InstitutionalActivity {
        increasing: u32,
        decreasing: u32,
        holders: u32,
    },
}

impl RawMeasurement {
    pub const fn kind(&self) -> IndicatorKind {
        match self {
            Self::Volatility { .. } => IndicatorKind::Volatility,
            Self::PutCallRatio { .. } => IndicatorKind::PutCallRatio,
            Self::Breadth { .. } => IndicatorKind::Breadth,
            Self::AdvanceDecline { .. } => IndicatorKind::AdvanceDecline,
            Self::TextSentiment { .. } => IndicatorKind::TextSentiment,
            Self::InsiderActivity { .. } => IndicatorKind::InsiderActivity,
            Self::InstitutionalActivity { .. } => IndicatorKind::InstitutionalActivity,
        }
    }

    /// Rejects NaN and infinite inputs. Finite out-of-range values are accepted
    /// here and clamped later by the normalizer.
    pub fn validate(&self) -> Result<(), MalformedReading> {
        let kind = self.kind();
        match *self {
            Self::Volatility { level } => require_finite(kind, "level", level),
            Self::PutCallRatio { ratio } => require_finite(kind, "ratio", ratio),
            Self::Breadth {
                price_change_pct,
                volatility,
            } => {
                require_finite(kind, "price_change_pct", price_change_pct)?;
                require_finite(kind, "volatility", volatility)
            }
            Self::AdvanceDecline { slope } => require_finite(kind, "slope", slope),
            Self::TextSentiment { mean_polarity } => {
                require_finite(kind, "mean_polarity", mean_polarity)
            }
            Self::InsiderActivity { .. } | Self::InstitutionalActivity { .. } => Ok(()),
        }
    }
}

fn require_finite(kind: IndicatorKind, field: &str, value: f64) -> Result<(), MalformedReading> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MalformedReading::new(kind, field))
    }
}

/// Whether the upstream source returned usable data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Present(RawMeasurement),
    Absent,
}

/// One raw observation for one indicator at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReadingRecord")]
pub struct IndicatorReading {
    kind: IndicatorKind,
    observation: Observation,
    as_of: UtcDateTime,
}

impl IndicatorReading {
    pub fn present(measurement: RawMeasurement, as_of: UtcDateTime) -> Self {
        Self {
            kind: measurement.kind(),
            observation: Observation::Present(measurement),
            as_of,
        }
    }

    pub fn absent(kind: IndicatorKind, as_of: UtcDateTime) -> Self {
        Self {
            kind,
            observation: Observation::Absent,
            as_of,
        }
    }

    pub const fn kind(&self) -> IndicatorKind {
        self.kind
    }

    pub const fn observation(&self) -> &Observation {
        &self.observation
    }

    pub const fn measurement(&self) -> Option<&RawMeasurement> {
        match &self.observation {
            Observation::Present(measurement) => Some(measurement),
            Observation::Absent => None,
        }
    }

    pub const fn is_present(&self) -> bool {
        matches!(self.observation, Observation::Present(_))
    }

    pub const fn as_of(&self) -> UtcDateTime {
        self.as_of
    }
}

#[derive(Deserialize)]
struct ReadingRecord {
    kind: IndicatorKind,
    observation: Observation,
    as_of: UtcDateTime,
}

impl TryFrom<ReadingRecord> for IndicatorReading {
    type Error = ValidationError;

    fn try_from(record: ReadingRecord) -> Result<Self, Self::Error> {
        if let Observation::Present(measurement) = &record.observation {
            if measurement.kind() != record.kind {
                return Err(ValidationError::ReadingKindMismatch {
                    expected: record.kind,
                    found: measurement.kind(),
                });
            }
        }

        Ok(Self {
            kind: record.kind,
            observation: record.observation,
            as_of: record.as_of,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> UtcDateTime {
        UtcDateTime::parse("2024-11-08T21:00:00Z").expect("timestamp")
    }

    #[test]
    fn present_reading_takes_kind_from_measurement() {
        let reading = IndicatorReading::present(RawMeasurement::PutCallRatio { ratio: 1.34 }, as_of());
        assert_eq!(reading.kind(), IndicatorKind::PutCallRatio);
        assert!(reading.is_present());
    }

    #[test]
    fn absent_reading_carries_no_measurement() {
        let reading = IndicatorReading::absent(IndicatorKind::Breadth, as_of());
        assert!(!reading.is_present());
        assert!(reading.measurement().is_none());
    }

    #[test]
    fn flags_non_finite_fields_by_name() {
        let measurement = RawMeasurement::Breadth {
            price_change_pct: 1.2,
            volatility: f64::NAN,
        };
        let err = measurement.validate().expect_err("must fail");
        assert_eq!(err.kind, IndicatorKind::Breadth);
        assert_eq!(err.field, "volatility");
    }

    #[test]
    fn parses_kind_names_loosely() {
        assert_eq!(
            "put-call_ratio".parse::<IndicatorKind>().expect("must parse"),
            IndicatorKind::PutCallRatio
        );
        assert!("vix".parse::<IndicatorKind>().is_err());
    }

    #[test]
    fn rejects_deserialized_kind_mismatch() {
        let json = r#"{
            "kind": "VOLATILITY",
            "observation": {"present": {"kind": "PUT_CALL_RATIO", "ratio": 0.9}},
            "as_of": "2024-11-08T21:00:00Z"
        }"#;
        assert!(serde_json::from_str::<IndicatorReading>(json).is_err());
    }

    #[test]
    fn deserializes_absent_reading() {
        let json = r#"{"kind": "BREADTH", "observation": "absent", "as_of": "2024-11-08T21:00:00Z"}"#;
        let reading: IndicatorReading = serde_json::from_str(json).expect("must parse");
        assert_eq!(reading.kind(), IndicatorKind::Breadth);
        assert!(!reading.is_present());
    }
}
