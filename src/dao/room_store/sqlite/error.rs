//! Error types shared by the SQLite storage implementation.

use thiserror::Error;
use time::OffsetDateTime;

use crate::{dao::storage::StorageError, util::try_format_timestamp};

/// Convenient result alias returning [`SqliteDaoError`] failures.
pub type SqliteResult<T> = Result<T, SqliteDaoError>;

/// Failures that can occur while interacting with the SQLite file.
#[derive(Debug, Error)]
pub enum SqliteDaoError {
    /// The database file could not be opened.
    #[error("failed to open SQLite database `{path}`")]
    Open {
        path: String,
        #[source]
        source: sqlx::Error,
    },
    /// Applying the embedded schema migrations failed.
    #[error("failed to migrate SQLite schema")]
    Migrate {
        #[source]
        source: sqlx::migrate::MigrateError,
    },
    /// A statement against a table failed.
    #[error("SQLite query on `{table}` failed")]
    Query {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
    /// A timestamp could not be written as RFC 3339 text.
    #[error("cannot store `{column}` as RFC 3339")]
    Timestamp {
        column: &'static str,
        #[source]
        source: time::error::Format,
    },
    /// A stored column held a value that does not map to the entity.
    #[error("invalid value in `{table}.{column}`: {value}")]
    InvalidColumn {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

impl SqliteDaoError {
    pub(super) fn query(table: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| SqliteDaoError::Query { table, source }
    }
}

/// Format `at` for the `column` it is written to.
pub(super) fn stamp(column: &'static str, at: OffsetDateTime) -> SqliteResult<String> {
    try_format_timestamp(at).map_err(|source| SqliteDaoError::Timestamp { column, source })
}

impl From<SqliteDaoError> for StorageError {
    fn from(err: SqliteDaoError) -> Self {
        match err {
            SqliteDaoError::InvalidColumn { .. } => StorageError::Corrupt {
                message: err.to_string(),
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
