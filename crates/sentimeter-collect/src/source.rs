use std::fmt::{Display, Formatter};
use std::str::FromStr;

use sentimeter_core::IndicatorKind;
use serde::{Deserialize, Serialize};

use crate::CollectError;

/// Upstream source families the collector can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    MarketData,
    OptionsChain,
    InsiderFilings,
    InstitutionalHoldings,
    SocialText,
}

impl SourceId {
    pub const ALL: [Self; 5] = [
        Self::MarketData,
        Self::OptionsChain,
        Self::InsiderFilings,
        Self::InstitutionalHoldings,
        Self::SocialText,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketData => "market_data",
            Self::OptionsChain => "options_chain",
            Self::InsiderFilings => "insider_filings",
            Self::InstitutionalHoldings => "institutional_holdings",
            Self::SocialText => "social_text",
        }
    }

    /// Indicator kinds this source family can supply.
    pub const fn provides(self) -> &'static [IndicatorKind] {
        match self {
            Self::MarketData => &[
                IndicatorKind::Volatility,
                IndicatorKind::Breadth,
                IndicatorKind::AdvanceDecline,
            ],
            Self::OptionsChain => &[IndicatorKind::PutCallRatio],
            Self::InsiderFilings => &[IndicatorKind::InsiderActivity],
            Self::InstitutionalHoldings => &[IndicatorKind::InstitutionalActivity],
            Self::SocialText => &[IndicatorKind::TextSentiment],
        }
    }

    pub fn supplies(self, kind: IndicatorKind) -> bool {
        self.provides().contains(&kind)
    }

    /// The source family that supplies `kind`.
    pub fn for_kind(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Volatility | IndicatorKind::Breadth | IndicatorKind::AdvanceDecline => {
                Self::MarketData
            }
            IndicatorKind::PutCallRatio => Self::OptionsChain,
            IndicatorKind::InsiderActivity => Self::InsiderFilings,
            IndicatorKind::InstitutionalActivity => Self::InstitutionalHoldings,
            IndicatorKind::TextSentiment => Self::SocialText,
        }
    }

    /// Prefix of this source's environment overrides, e.g. `SENTIMETER_SOCIAL_TEXT`.
    pub fn env_prefix(self) -> String {
        format!("SENTIMETER_{}", self.as_str().to_ascii_uppercase())
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = CollectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| CollectError::UnknownSource {
                value: value.to_owned(),
            })
    }
}
