//! # Sentimeter Core
//!
//! Aggregation engine that turns independently sourced, partially available
//! market and text indicators into one bounded composite score with a
//! discrete label.
//!
//! ## Overview
//!
//! - **Unit normalization** of heterogeneous raw readings onto `[-1, 1]`
//! - **Text sentiment combination** of two black-box polarity estimators
//! - **Availability-aware aggregation** that renormalizes weights over the
//!   indicators actually present
//! - **Band classification** with validated, explicitly edged band tables
//! - **Report assembly** for presentation and storage collaborators
//!
//! The crate performs no I/O and holds no mutable shared state.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregator`] | Weighted composite under partial availability |
//! | [`band`] | Band tables and classification |
//! | [`config`] | Engine weight and band configuration |
//! | [`domain`] | Readings, indicator kinds, symbols, timestamps |
//! | [`engine`] | Façade over normalizer, aggregators and report assembly |
//! | [`error`] | Core error types |
//! | [`labels`] | Label vocabularies |
//! | [`normalizer`] | Per-indicator unit scores |
//! | [`report`] | Report structure and metadata |
//! | [`text`] | Polarity estimators and the text combiner |
//! | [`weights`] | Weight tables |
//!
//! ## Quick Start
//!
//! ```rust
//! use sentimeter_core::{IndicatorKind, IndicatorReading, RawMeasurement, SentimentEngine, UtcDateTime};
//! use sentimeter_core::labels::CompositeLabel;
//!
//! let as_of = UtcDateTime::now();
//! let readings = [
//!     IndicatorReading::present(RawMeasurement::Volatility { level: 10.0 }, as_of),
//!     IndicatorReading::absent(IndicatorKind::PutCallRatio, as_of),
//! ];
//!
//! let assessment = SentimentEngine::default().market_composite(&readings);
//! assert_eq!(assessment.composite.score, 0.5);
//! assert_eq!(assessment.composite.label, CompositeLabel::Bullish);
//! assert!(assessment.composite.missing.contains(&IndicatorKind::PutCallRatio));
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! readings ──▶ Normalizer ──┐
//!                           ├──▶ Aggregator ──▶ band classification ──▶ SentimentReport
//! texts ──▶ TextCombiner ───┘
//! ```

pub mod aggregator;
pub mod band;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod labels;
pub mod normalizer;
pub mod report;
pub mod text;
pub mod weights;

pub use aggregator::{Aggregator, CompositeBands, CompositeResult, Contribution};
pub use band::{Band, BandTable, Edge};
pub use config::EngineConfig;
pub use domain::{IndicatorKind, IndicatorReading, Observation, RawMeasurement, Symbol, UtcDateTime};
pub use engine::{Assessment, ScoredReadings, SentimentEngine};
pub use error::{BandTableError, CoreError, MalformedReading, ValidationError};
pub use labels::{CompositeLabel, IndicatorLabel};
pub use normalizer::{IndicatorBands, Normalizer, UnitScore};
pub use report::{InstrumentSection, ReportMeta, SentimentReport, SCHEMA_VERSION};
pub use text::{
    clean_text, LexiconEstimator, PolarityEstimator, TextBatchSummary, TextScore,
    TextSentimentCombiner, VaderEstimator,
};
pub use weights::{WeightEntry, WeightTable};
