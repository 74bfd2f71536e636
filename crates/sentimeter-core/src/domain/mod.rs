//! # Domain Models
//!
//! Canonical input types for the aggregation engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`IndicatorKind`] | Which indicator a reading or score belongs to |
//! | [`RawMeasurement`] | Parsed raw inputs for one indicator |
//! | [`IndicatorReading`] | One observation, present or absent, with its timestamp |
//! | [`Symbol`] | Validated ticker for instrument-level composites |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Readings are built by collaborators, are immutable, and are consumed once by
//! the [`Normalizer`](crate::Normalizer). Absence is a variant of
//! [`Observation`], not a sentinel value:
//!
//! ```rust
//! use sentimeter_core::{IndicatorKind, IndicatorReading, RawMeasurement, UtcDateTime};
//!
//! let as_of = UtcDateTime::parse("2024-11-08T21:00:00Z").unwrap();
//! let vix = IndicatorReading::present(RawMeasurement::Volatility { level: 16.9 }, as_of);
//! let breadth = IndicatorReading::absent(IndicatorKind::Breadth, as_of);
//!
//! assert!(vix.is_present());
//! assert!(breadth.measurement().is_none());
//! ```

mod indicator;
mod symbol;
mod timestamp;

pub use indicator::{IndicatorKind, IndicatorReading, Observation, RawMeasurement};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
