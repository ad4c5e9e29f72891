//! Error taxonomy for the cogbench workspace.
//!
//! Each failure class from the evaluation protocol is a distinct, named
//! error kind: specification validation, dataset ingestion, plugin
//! resolution, model applicability, and comparator mismatches. Model code
//! failures (predict/adapt/hooks) propagate unchanged through
//! [`BenchError::Model`].

use std::path::PathBuf;

use crate::domain::item::ResponseType;

/// Errors raised while parsing and validating a benchmark specification.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("benchmark is missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid benchmark type: {value} (expected prediction, adaption, or coverage)")]
    InvalidType { value: String },

    #[error("unknown comparator: {name}")]
    UnknownComparator { name: String },

    #[error("unknown encoder: {name}")]
    UnknownEncoder { name: String },

    #[error("benchmark type 'coverage' must not declare data.pre_train_person")]
    CoveragePersonTrain,

    #[error("auxiliary evaluation column '{column}' is not a declared target column")]
    UnknownAuxColumn { column: String },

    #[error("failed to read benchmark file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse benchmark file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading or validating a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("dataset {path} does not contain required columns: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("dataset {path} row {row}: invalid sequence number '{value}'")]
    InvalidSequence {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("unknown response type: {value}")]
    UnknownResponseType { value: String },

    #[error("failed to read dataset {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors raised while resolving a model plugin to a registered factory.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("no suitable model manifest found at {path}")]
    NoCandidate { path: PathBuf },

    #[error("ambiguous model manifests at {path}: candidates were {candidates:?}")]
    AmbiguousCandidates {
        path: PathBuf,
        candidates: Vec<String>,
    },

    #[error("failed to instantiate model '{kind}': {source}")]
    Instantiation {
        kind: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Error raised when a comparator is invoked with inputs it cannot score.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("comparator '{comparator}' does not support response type '{response_type}'")]
    UnsupportedResponseType {
        comparator: String,
        response_type: ResponseType,
    },

    #[error("comparator '{comparator}' requires numeric operands, got '{value}'")]
    NotNumeric { comparator: String, value: String },
}

/// Cogbench evaluation errors.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("spec validation error: {0}")]
    Spec(#[from] SpecError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error(
        "model '{model}' is not applicable to the test data: \
         missing domains {missing_domains:?}, missing response types {missing_response_types:?}"
    )]
    Applicability {
        model: String,
        missing_domains: Vec<String>,
        missing_response_types: Vec<ResponseType>,
    },

    #[error("comparison error: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("model failure: {0}")]
    Model(#[source] anyhow::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cogbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_error_display() {
        let err = SpecError::MissingField {
            field: "data.test".to_string(),
        };
        assert!(err.to_string().contains("data.test"));

        let err = SpecError::InvalidType {
            value: "simulation".to_string(),
        };
        assert!(err.to_string().contains("simulation"));
    }

    #[test]
    fn test_resolution_error_names_candidates() {
        let err = ResolutionError::AmbiguousCandidates {
            path: PathBuf::from("/models/dual"),
            candidates: vec!["mfa".to_string(), "uniform".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("mfa"));
        assert!(msg.contains("uniform"));
    }

    #[test]
    fn test_applicability_error_display() {
        let err = BenchError::Applicability {
            model: "TransSet".to_string(),
            missing_domains: vec!["syllogistic".to_string()],
            missing_response_types: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("TransSet"));
        assert!(msg.contains("syllogistic"));
    }

    #[test]
    fn test_comparison_error_display() {
        let err = ComparisonError::UnsupportedResponseType {
            comparator: "Absolute Difference".to_string(),
            response_type: ResponseType::MultipleChoice,
        };
        assert!(err.to_string().contains("multiple-choice"));
    }
}
