use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::IndicatorKind;

/// Validation and contract errors exposed by `sentimeter-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("unknown indicator '{value}'")]
    UnknownIndicator { value: String },
    #[error("reading declared as '{expected}' carries a '{found}' measurement")]
    ReadingKindMismatch {
        expected: IndicatorKind,
        found: IndicatorKind,
    },

    #[error("weight table must contain at least one indicator")]
    EmptyWeightTable,
    #[error("weight table lists indicator '{kind}' more than once")]
    DuplicateWeight { kind: IndicatorKind },
    #[error("weight for indicator '{kind}' must be finite and non-negative")]
    InvalidWeight { kind: IndicatorKind },

    #[error("report_id must be at least 8 characters")]
    InvalidReportId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("report must contain at least one composite result")]
    EmptyReport,
}

/// Band table misconfiguration. Raised when a table is built, never by runtime data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BandTableError {
    #[error("band table must contain at least one band")]
    Empty,
    #[error("band {index} has a non-finite edge")]
    NonFiniteEdge { index: usize },
    #[error("band {index} is empty (lower edge is not below upper edge)")]
    EmptyBand { index: usize },
    #[error("band {index} has an unbounded edge in an interior position")]
    InteriorUnbounded { index: usize },
    #[error("gap after band {index}")]
    Gap { index: usize },
    #[error("band {index} overlaps the band that follows it")]
    Overlap { index: usize },
}

/// A reading whose measurement carries a non-finite value.
///
/// The pipeline excludes such readings (treats them as absent) instead of
/// failing the whole computation.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("malformed {kind} reading: field '{field}' must be finite")]
pub struct MalformedReading {
    pub kind: IndicatorKind,
    pub field: String,
}

impl MalformedReading {
    pub fn new(kind: IndicatorKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
        }
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("band table misconfiguration: {0}")]
    BandTable(#[from] BandTableError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
