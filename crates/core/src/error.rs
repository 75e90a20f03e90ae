//! Error model shared by the engine and its collaborators.

use thiserror::Error;

/// Result type for data-access operations.
pub type DataAccessResult<T> = Result<T, DataAccessError>;

/// Failure raised by a data-access collaborator.
///
/// The metrics engine never produces these itself; it forwards them to its
/// caller untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataAccessError {
    /// The relational source could not be reached or opened.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A query was rejected or failed while executing.
    #[error("query failed: {0}")]
    Query(String),

    /// A row came back but one of its values could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl DataAccessError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Failure of an analytics helper (scenario, forecast) over engine output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A caller-supplied parameter is outside its accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Not enough observations to fit or project anything.
    #[error("insufficient data: need at least {needed} points, found {found}")]
    InsufficientData { needed: usize, found: usize },

    /// Propagated from the data source feeding the helper.
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl AnalyticsError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
