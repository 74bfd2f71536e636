//! Fixed, ordered label vocabularies, one per indicator kind plus the composite.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::IndicatorKind;

macro_rules! label_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityLabel {
    Panic,
    Fear,
    Neutral,
    Complacent,
}

label_names!(VolatilityLabel {
    Panic => "PANIC",
    Fear => "FEAR",
    Neutral => "NEUTRAL",
    Complacent => "COMPLACENT",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PutCallLabel {
    Bullish,
    Neutral,
    Bearish,
    ExtremeBearish,
}

label_names!(PutCallLabel {
    Bullish => "BULLISH",
    Neutral => "NEUTRAL",
    Bearish => "BEARISH",
    ExtremeBearish => "EXTREME_BEARISH",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreadthLabel {
    BroadStrength,
    NarrowLeadership,
    BroadWeakness,
}

label_names!(BreadthLabel {
    BroadStrength => "BROAD_STRENGTH",
    NarrowLeadership => "NARROW_LEADERSHIP",
    BroadWeakness => "BROAD_WEAKNESS",
});

/// Advance/decline line direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    Falling,
    Flat,
    Rising,
}

label_names!(TrendLabel {
    Falling => "FALLING",
    Flat => "FLAT",
    Rising => "RISING",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

label_names!(TextLabel {
    VeryNegative => "VERY_NEGATIVE",
    Negative => "NEGATIVE",
    Neutral => "NEUTRAL",
    Positive => "POSITIVE",
    VeryPositive => "VERY_POSITIVE",
});

/// Net direction of insider or institutional transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLabel {
    Bearish,
    Neutral,
    Bullish,
}

label_names!(ActivityLabel {
    Bearish => "BEARISH",
    Neutral => "NEUTRAL",
    Bullish => "BULLISH",
});

/// Composite classification. The three-band variant uses only
/// `Bearish`, `Neutral` and `Bullish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositeLabel {
    Bearish,
    SlightlyBearish,
    Neutral,
    SlightlyBullish,
    Bullish,
}

label_names!(CompositeLabel {
    Bearish => "BEARISH",
    SlightlyBearish => "SLIGHTLY_BEARISH",
    Neutral => "NEUTRAL",
    SlightlyBullish => "SLIGHTLY_BULLISH",
    Bullish => "BULLISH",
});

/// Label of a unit score, tagged by the indicator it describes.
///
/// The tag doubles as the unit score's kind, so a label can never be paired
/// with the wrong indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorLabel {
    Volatility(VolatilityLabel),
    PutCallRatio(PutCallLabel),
    Breadth(BreadthLabel),
    AdvanceDecline(TrendLabel),
    TextSentiment(TextLabel),
    InsiderActivity(ActivityLabel),
    InstitutionalActivity(ActivityLabel),
}

impl IndicatorLabel {
    pub const fn kind(self) -> IndicatorKind {
        match self {
            Self::Volatility(_) => IndicatorKind::Volatility,
            Self::PutCallRatio(_) => IndicatorKind::PutCallRatio,
            Self::Breadth(_) => IndicatorKind::Breadth,
            Self::AdvanceDecline(_) => IndicatorKind::AdvanceDecline,
            Self::TextSentiment(_) => IndicatorKind::TextSentiment,
            Self::InsiderActivity(_) => IndicatorKind::InsiderActivity,
            Self::InstitutionalActivity(_) => IndicatorKind::InstitutionalActivity,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volatility(label) => label.as_str(),
            Self::PutCallRatio(label) => label.as_str(),
            Self::Breadth(label) => label.as_str(),
            Self::AdvanceDecline(label) => label.as_str(),
            Self::TextSentiment(label) => label.as_str(),
            Self::InsiderActivity(label) | Self::InstitutionalActivity(label) => label.as_str(),
        }
    }
}

impl Display for IndicatorLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_tag_determines_kind() {
        let label = IndicatorLabel::InstitutionalActivity(ActivityLabel::Bullish);
        assert_eq!(label.kind(), IndicatorKind::InstitutionalActivity);
        assert_eq!(label.as_str(), "BULLISH");
        assert_eq!(label.to_string(), "INSTITUTIONAL_ACTIVITY:BULLISH");
    }

    #[test]
    fn serializes_with_documented_vocabulary() {
        let json = serde_json::to_value(IndicatorLabel::PutCallRatio(PutCallLabel::ExtremeBearish))
            .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"kind": "PUT_CALL_RATIO", "label": "EXTREME_BEARISH"})
        );
        assert_eq!(
            serde_json::to_value(CompositeLabel::SlightlyBullish).expect("serialize"),
            serde_json::json!("SLIGHTLY_BULLISH")
        );
    }
}
