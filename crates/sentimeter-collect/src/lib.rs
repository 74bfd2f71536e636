//! # Sentimeter Collect
//!
//! Collection layer around the sentimeter aggregation core.
//!
//! ## Overview
//!
//! - **Source contract** for upstream adapters (market data, options chains,
//!   filings, holdings, social text)
//! - **Per-source throttling** with a minimum call interval and a hard daily quota
//! - **Circuit breaking** so a failing source is skipped instead of hammered
//! - **Absence-tolerant collection**: every source failure becomes an absent
//!   reading plus a warning
//! - **Analysis pipeline** from registered sources to a `SentimentReport`
//!
//! Network adapters are supplied by the host application through
//! [`IndicatorSource`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`circuit_breaker`] | Circuit breaker per source |
//! | [`collector`] | Routing, throttling and retries around sources |
//! | [`error`] | Collection-layer configuration errors |
//! | [`indicator_source`] | Source trait, requests, payloads and errors |
//! | [`pipeline`] | Collector plus engine into reports |
//! | [`provider_policy`] | Per-source throttling and retry policies |
//! | [`source`] | Source identifiers |
//! | [`throttling`] | Minimum interval and daily quota enforcement |
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ SentimentPipeline  │
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐     ┌──────────────────┐
//! │  ReadingCollector  │────▶│ Circuit Breaker  │
//! └─────────┬──────────┘     │ Throttling Queue │
//!           │                └──────────────────┘
//!           ▼
//! ┌────────────────────┐
//! │  IndicatorSource   │
//! │  (adapter trait)   │
//! └─────────┬──────────┘
//!           │ readings
//!           ▼
//! ┌────────────────────┐
//! │  SentimentEngine   │
//! └────────────────────┘
//! ```

pub mod circuit_breaker;
pub mod collector;
pub mod error;
pub mod indicator_source;
pub mod pipeline;
pub mod provider_policy;
pub mod source;
pub mod throttling;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use collector::{Collection, ReadingCollector};
pub use error::CollectError;
pub use indicator_source::{
    FetchFuture, FetchRequest, IndicatorSource, Scope, SourceError, SourceErrorKind,
    SourcePayload,
};
pub use pipeline::SentimentPipeline;
pub use provider_policy::{BackoffPolicy, SourcePolicy};
pub use source::SourceId;
pub use throttling::{Throttle, ThrottlingQueue};
