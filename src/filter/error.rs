use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid page number: {0} (must be 1 or greater)")]
    InvalidPageNumber(i64),

    #[error("Invalid page size: {0} (must be 1 or greater)")]
    InvalidPageSize(i64),
}
