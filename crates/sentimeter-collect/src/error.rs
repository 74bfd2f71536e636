use thiserror::Error;

/// Configuration errors raised by the collection layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("unknown source '{value}'")]
    UnknownSource { value: String },

    #[error("environment override {var}='{value}' is not a non-negative integer")]
    InvalidOverride { var: String, value: String },
}
