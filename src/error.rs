//! Error types for the HPI forecasting pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while preparing a series or producing forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Input data contains no rows.
    #[error("empty input data")]
    EmptyData,

    /// A required column is absent from the input table.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// The requested entity has no rows in the table.
    #[error("no rows found for entity '{0}'")]
    EntityNotFound(String),

    /// No candidate model in the search space could be fitted.
    #[error("model search failed: no candidate could be fitted")]
    SearchFailed,

    /// The final model fit or the prediction step failed.
    #[error("forecast failed: {0}")]
    Forecast(String),

    /// The two model outputs could not be reconciled.
    #[error("forecast alignment failed: {0}")]
    Alignment(String),

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A model was asked to predict before being fitted.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp or period parsing/ordering error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Numerical failure during estimation.
    #[error("computation error: {0}")]
    ComputationError(String),

    /// Malformed input that could not be read.
    #[error("input error: {0}")]
    InputError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = PipelineError::EntityNotFound("Auckland".to_string());
        assert_eq!(err.to_string(), "no rows found for entity 'Auckland'");

        let err = PipelineError::SearchFailed;
        assert_eq!(
            err.to_string(),
            "model search failed: no candidate could be fitted"
        );

        let err = PipelineError::Alignment("2 rows short".to_string());
        assert_eq!(err.to_string(), "forecast alignment failed: 2 rows short");

        let err = PipelineError::InsufficientData { needed: 12, got: 7 };
        assert_eq!(err.to_string(), "insufficient data: need at least 12, got 7");

        let err = PipelineError::MissingColumn("date or quarter".to_string());
        assert_eq!(err.to_string(), "missing required column: date or quarter");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = PipelineError::SearchFailed;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
