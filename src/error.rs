use std::path::PathBuf;
use thiserror::Error;

/// Rejected form values, caught before anything reaches the encoder.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("budget must be at least ${min}, got ${got}")]
    BudgetTooLow { got: u64, min: u64 },

    #[error("at most {max} genres may be selected, got {got}")]
    TooManyGenres { got: usize, max: usize },

    #[error("at most {max} actors may be selected, got {got}")]
    TooManyActors { got: usize, max: usize },

    #[error("release month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}

/// Failures while loading or writing the startup artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to decode model from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rmp_serde::decode::Error,
    },

    #[error("failed to encode model to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: rmp_serde::encode::Error,
    },

    #[error("monthly revenue table is empty")]
    EmptyMonthTable,

    #[error("monthly revenue table has invalid month {0}")]
    InvalidMonth(u32),

    #[error("monthly revenue table has a non-finite strength for month {0}")]
    InvalidStrength(u32),

    #[error("unknown feature column `{0}`")]
    UnknownColumn(String),

    #[error("duplicate feature column `{0}`")]
    DuplicateColumn(String),

    #[error("revenue model has {coefficients} coefficients but {columns} feature columns")]
    CoefficientMismatch { coefficients: usize, columns: usize },
}

/// Inference-time failures. These indicate broken artifacts and are not retried.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("feature vector columns do not match the {model} model")]
    ColumnMismatch { model: &'static str },

    #[error("classifier has no positive class label")]
    MissingPositiveClass,

    #[error("{model} model returned no prediction")]
    EmptyPrediction { model: &'static str },
}
