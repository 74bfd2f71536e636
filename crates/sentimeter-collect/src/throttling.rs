use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use sentimeter_core::UtcDateTime;
use time::Date;

use crate::provider_policy::{BackoffPolicy, SourcePolicy};

/// Why a call may not proceed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throttle {
    /// Minimum interval not yet elapsed; the call may proceed after the delay.
    RetryAfter(Duration),
    /// Daily quota used up until the next UTC day.
    QuotaExhausted,
}

/// Per-source gate enforcing a minimum call interval and a hard daily quota.
#[derive(Clone)]
pub struct ThrottlingQueue {
    limiter: Option<Arc<DirectRateLimiter>>,
    clock: DefaultClock,
    daily_quota: Option<u32>,
    usage: Arc<Mutex<DailyUsage>>,
    retry_backoff: BackoffPolicy,
}

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Debug, Clone, Copy)]
struct DailyUsage {
    day: Option<Date>,
    calls: u32,
}

impl ThrottlingQueue {
    pub fn new(
        min_interval: Duration,
        daily_quota: Option<u32>,
        retry_backoff: BackoffPolicy,
    ) -> Self {
        let clock = DefaultClock::default();
        let limiter = Quota::with_period(min_interval)
            .map(|quota| quota.allow_burst(NonZeroU32::MIN))
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        Self {
            limiter,
            clock,
            daily_quota,
            usage: Arc::new(Mutex::new(DailyUsage {
                day: None,
                calls: 0,
            })),
            retry_backoff,
        }
    }

    pub fn from_policy(policy: &SourcePolicy) -> Self {
        Self::new(
            policy.min_interval,
            policy.daily_quota,
            policy.retry_backoff.clone(),
        )
    }

    /// Takes one call slot for today (UTC).
    pub fn acquire(&self) -> Result<(), Throttle> {
        self.acquire_on(UtcDateTime::now().date())
    }

    /// Takes one call slot, counting quota against `today`. A new day resets
    /// the count.
    pub fn acquire_on(&self, today: Date) -> Result<(), Throttle> {
        let mut usage = self
            .usage
            .lock()
            .expect("throttling usage counter should not be poisoned");
        if usage.day != Some(today) {
            usage.day = Some(today);
            usage.calls = 0;
        }

        if let Some(quota) = self.daily_quota {
            if usage.calls >= quota {
                return Err(Throttle::QuotaExhausted);
            }
        }

        if let Some(limiter) = &self.limiter {
            if let Err(not_until) = limiter.check() {
                let wait = not_until.wait_time_from(self.clock.now());
                return Err(Throttle::RetryAfter(wait));
            }
        }

        usage.calls = usage.calls.saturating_add(1);
        Ok(())
    }

    /// Calls left today, or `None` without a quota.
    pub fn remaining_today(&self, today: Date) -> Option<u32> {
        let quota = self.daily_quota?;
        let usage = self
            .usage
            .lock()
            .expect("throttling usage counter should not be poisoned");
        let used = if usage.day == Some(today) { usage.calls } else { 0 };
        Some(quota.saturating_sub(used))
    }

    /// Backoff before retry number `retry_count` (zero-based), or `None`
    /// once retries are exhausted.
    pub fn retry_delay(&self, retry_count: u32) -> Option<Duration> {
        if retry_count >= self.retry_backoff.max_retries {
            return None;
        }

        let scale = self.retry_backoff.multiplier.powf(f64::from(retry_count));
        let seconds = self.retry_backoff.initial_delay.as_secs_f64() * scale;
        let capped_seconds = seconds.min(self.retry_backoff.max_delay.as_secs_f64());
        Some(Duration::from_secs_f64(capped_seconds))
    }

    pub fn max_retries(&self) -> u32 {
        self.retry_backoff.max_retries
    }
}

impl std::fmt::Debug for ThrottlingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottlingQueue")
            .field("spaced", &self.limiter.is_some())
            .field("daily_quota", &self.daily_quota)
            .field("retry_backoff", &self.retry_backoff)
            .finish_non_exhaustive()
    }
}
