/// Errors raised while building the index, ingesting a dataset or reading queries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset row {row} has {found} fields, expected {expected}")]
    FieldCount {
        row: u64,
        found: usize,
        expected: usize,
    },

    #[error("invalid query line {0:?}: expected \"<longitude> <latitude>\"")]
    InvalidQuery(String),

    #[error("Expected stage was {expected}, received {found}")]
    StageMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("invalid root bounds: {0}")]
    InvalidBounds(String),

    #[error("node capacity must be at least 1")]
    InvalidCapacity,
}

pub type Result<T> = std::result::Result<T, Error>;
