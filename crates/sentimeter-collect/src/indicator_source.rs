use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use sentimeter_core::{IndicatorKind, RawMeasurement, Symbol};

use crate::SourceId;

/// What a fetch is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Market,
    Instrument(Symbol),
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Market => f.write_str("market"),
            Self::Instrument(symbol) => write!(f, "instrument:{symbol}"),
        }
    }
}

/// Request for one indicator's raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: IndicatorKind,
    pub scope: Scope,
}

impl FetchRequest {
    pub fn new(kind: IndicatorKind, scope: Scope) -> Self {
        Self { kind, scope }
    }
}

/// Parsed upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePayload {
    Measurement(RawMeasurement),
    /// Free-text items to be scored by the text combiner.
    Texts(Vec<String>),
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    QuotaExhausted,
    InvalidRequest,
    NotRegistered,
    Internal,
}

/// Structured error returned by a source or raised by the collector around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn quota_exhausted(source: SourceId) -> Self {
        Self {
            kind: SourceErrorKind::QuotaExhausted,
            message: format!("daily quota for source '{source}' is exhausted"),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn not_registered(kind: IndicatorKind) -> Self {
        Self {
            kind: SourceErrorKind::NotRegistered,
            message: format!("no source registered for indicator '{kind}'"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::QuotaExhausted => "source.quota_exhausted",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotRegistered => "source.not_registered",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Boxed future returned by [`IndicatorSource::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SourcePayload, SourceError>> + Send + 'a>>;

/// Upstream adapter contract.
///
/// Implementations fetch and parse one provider's data; throttling, circuit
/// breaking and retries are applied around them by the collector.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`id`](IndicatorSource::id) | Source family, decides which kinds route here |
/// | [`fetch`](IndicatorSource::fetch) | Raw input for one indicator |
pub trait IndicatorSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Fetches the raw input for `req.kind`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable, rejects the
    /// request or returns data that cannot be parsed.
    fn fetch<'a>(&'a self, req: FetchRequest) -> FetchFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_retryability_follows_kind() {
        let unavailable = SourceError::unavailable("upstream timed out");
        assert_eq!(unavailable.code(), "source.unavailable");
        assert!(unavailable.retryable());

        let exhausted = SourceError::quota_exhausted(SourceId::InstitutionalHoldings);
        assert_eq!(exhausted.code(), "source.quota_exhausted");
        assert!(!exhausted.retryable());
        assert_eq!(
            exhausted.to_string(),
            "daily quota for source 'institutional_holdings' is exhausted (source.quota_exhausted)"
        );
    }

    #[test]
    fn scope_display_names_the_symbol() {
        let symbol = Symbol::parse("TSLA").expect("valid symbol");
        assert_eq!(Scope::Instrument(symbol).to_string(), "instrument:TSLA");
        assert_eq!(Scope::Market.to_string(), "market");
    }
}
