use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Invalid value '{value}' for column '{column}' in {table} table (row {row})")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Duplicate business record for date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MetricsResult<T> = Result<T, MetricsError>;
