use std::env;
use std::time::Duration;

use crate::{CollectError, SourceId};

/// Throttling, retry and circuit-breaking policy for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePolicy {
    pub source_id: SourceId,
    /// Minimum spacing between successive calls. Zero disables spacing.
    pub min_interval: Duration,
    /// Hard cap on calls per UTC day.
    pub daily_quota: Option<u32>,
    pub retry_backoff: BackoffPolicy,
    pub failure_threshold: u32,
    pub open_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_retries: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            max_retries: 2,
        }
    }
}

impl SourcePolicy {
    fn base(source_id: SourceId, min_interval: Duration, daily_quota: Option<u32>) -> Self {
        Self {
            source_id,
            min_interval,
            daily_quota,
            retry_backoff: BackoffPolicy::default(),
            failure_threshold: 3,
            open_timeout: Duration::from_secs(30),
        }
    }

    pub fn market_data_default() -> Self {
        Self::base(SourceId::MarketData, Duration::from_secs(1), None)
    }

    pub fn options_chain_default() -> Self {
        Self::base(SourceId::OptionsChain, Duration::from_secs(1), None)
    }

    /// Filings index allows ten requests per second.
    pub fn insider_filings_default() -> Self {
        Self::base(SourceId::InsiderFilings, Duration::from_millis(100), None)
    }

    /// Holdings API free tier: 250 calls per day.
    pub fn institutional_holdings_default() -> Self {
        Self::base(
            SourceId::InstitutionalHoldings,
            Duration::from_millis(500),
            Some(250),
        )
    }

    /// Social search allows roughly 450 calls per 15 minutes.
    pub fn social_text_default() -> Self {
        Self::base(SourceId::SocialText, Duration::from_secs(2), None)
    }

    pub fn default_for(source_id: SourceId) -> Self {
        match source_id {
            SourceId::MarketData => Self::market_data_default(),
            SourceId::OptionsChain => Self::options_chain_default(),
            SourceId::InsiderFilings => Self::insider_filings_default(),
            SourceId::InstitutionalHoldings => Self::institutional_holdings_default(),
            SourceId::SocialText => Self::social_text_default(),
        }
    }

    /// Applies `SENTIMETER_<SOURCE>_MIN_INTERVAL_MS` and
    /// `SENTIMETER_<SOURCE>_DAILY_QUOTA` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, CollectError> {
        self.with_overrides_from(|var| env::var(var).ok())
    }

    /// Applies overrides from an arbitrary lookup. A daily quota of `0`
    /// removes the quota.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CollectError> {
        let prefix = self.source_id.env_prefix();

        let interval_var = format!("{prefix}_MIN_INTERVAL_MS");
        if let Some(millis) = parse_override(&interval_var, lookup(&interval_var))? {
            self.min_interval = Duration::from_millis(millis);
        }

        let quota_var = format!("{prefix}_DAILY_QUOTA");
        if let Some(quota) = parse_override(&quota_var, lookup(&quota_var))? {
            let quota = u32::try_from(quota).map_err(|_| CollectError::InvalidOverride {
                var: quota_var.clone(),
                value: quota.to_string(),
            })?;
            self.daily_quota = (quota > 0).then_some(quota);
        }

        Ok(self)
    }
}

fn parse_override(var: &str, value: Option<String>) -> Result<Option<u64>, CollectError> {
    let Some(value) = value else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| CollectError::InvalidOverride {
            var: var.to_owned(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn institutional_policy_has_daily_quota() {
        let policy = SourcePolicy::institutional_holdings_default();

        assert_eq!(policy.source_id, SourceId::InstitutionalHoldings);
        assert_eq!(policy.min_interval, Duration::from_millis(500));
        assert_eq!(policy.daily_quota, Some(250));
    }

    #[test]
    fn insider_policy_allows_ten_per_second() {
        let policy = SourcePolicy::insider_filings_default();

        assert_eq!(policy.min_interval, Duration::from_millis(100));
        assert_eq!(policy.daily_quota, None);
        assert_eq!(policy.retry_backoff.max_retries, 2);
    }

    #[test]
    fn defaults_exist_for_every_source() {
        for id in SourceId::ALL {
            assert_eq!(SourcePolicy::default_for(id).source_id, id);
        }
    }

    #[test]
    fn overrides_apply_per_source() {
        let vars = HashMap::from([
            ("SENTIMETER_SOCIAL_TEXT_MIN_INTERVAL_MS", "250"),
            ("SENTIMETER_SOCIAL_TEXT_DAILY_QUOTA", "1000"),
            ("SENTIMETER_MARKET_DATA_MIN_INTERVAL_MS", "1"),
        ]);
        let lookup = |var: &str| vars.get(var).map(|value| (*value).to_owned());

        let policy = SourcePolicy::social_text_default()
            .with_overrides_from(lookup)
            .expect("valid overrides");

        assert_eq!(policy.min_interval, Duration::from_millis(250));
        assert_eq!(policy.daily_quota, Some(1000));
    }

    #[test]
    fn zero_quota_override_removes_quota() {
        let policy = SourcePolicy::institutional_holdings_default()
            .with_overrides_from(|var| {
                (var == "SENTIMETER_INSTITUTIONAL_HOLDINGS_DAILY_QUOTA").then(|| "0".to_owned())
            })
            .expect("valid overrides");

        assert_eq!(policy.daily_quota, None);
    }

    #[test]
    fn rejects_non_numeric_override() {
        let err = SourcePolicy::market_data_default()
            .with_overrides_from(|var| {
                (var == "SENTIMETER_MARKET_DATA_MIN_INTERVAL_MS").then(|| "fast".to_owned())
            })
            .expect_err("must fail");

        assert_eq!(
            err,
            CollectError::InvalidOverride {
                var: "SENTIMETER_MARKET_DATA_MIN_INTERVAL_MS".to_owned(),
                value: "fast".to_owned(),
            }
        );
    }
}
