/// Errors from the table cleanup stages that callers may reasonably want to distinguish.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum CleanupError {
    #[error("no fully populated row found to use as the header")]
    NoHeaderRow,
    #[error("expected column {0:?} is missing")]
    MissingColumn(String),
    #[error("row has {found} cells, but the header only has {expected} columns")]
    ColumnCountMismatch { expected: usize, found: usize },
    #[error("summary table has no cell at row {row}, column {column}")]
    SummaryFieldMissing { row: usize, column: usize },
}

/// Errors in the provider configuration.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown provider {0:?}")]
    UnknownProvider(String),
    #[error("provider {provider:?}: {reason}")]
    InvalidProvider { provider: String, reason: String },
}
