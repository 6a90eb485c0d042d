use std::fmt;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors raised while building or running a statement.
///
/// Shape and clause errors are programmer-facing and never retried.
/// Engine errors are passed through untouched.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither positional nor keyword data was supplied.
    #[error("{operation}: no data supplied")]
    NoData { operation: &'static str },

    /// Positional/keyword arguments could not be reduced to one shape.
    #[error("{operation}: {message}")]
    Shape {
        operation: &'static str,
        message: String,
    },

    /// A clause parameter had a shape the clause does not accept.
    #[error("{clause}: unsupported {received}")]
    ClauseType {
        clause: &'static str,
        received: String,
    },

    /// An empty token list was handed to the schema text normalizer.
    #[error("cannot render an empty sequence as schema text")]
    EmptySequence,

    /// The table is absent or has no columns.
    #[error("table {0} has no columns or does not exist")]
    NoSuchTable(String),

    /// Failure reported by the SQL engine.
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Shape {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn clause(clause: &'static str, received: impl Into<String>) -> Self {
        Error::ClauseType {
            clause,
            received: received.into(),
        }
    }

    /// Category of an engine failure, `None` for errors raised by this crate.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Error::Engine(err) => Some(categorize(err)),
            _ => None,
        }
    }

    /// True for engine failures the fast-path INSERT recovers from by
    /// retrying with explicit columns: generic operational errors (column
    /// count mismatch, missing table) and parameter count mismatches.
    pub fn is_arity_failure(&self) -> bool {
        match self {
            Error::Engine(rusqlite::Error::InvalidParameterCount(..)) => true,
            Error::Engine(err) => categorize(err) == ErrorCategory::Operational,
            _ => false,
        }
    }
}

/// Coarse classification of SQLite failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Generic SQLITE_ERROR: syntax errors, missing tables, arity mismatches
    Operational,
    /// Constraint violations (UNIQUE, NOT NULL, CHECK, FOREIGN KEY)
    Constraint,
    /// Database busy or locked
    Busy,
    /// File, disk or open failures
    Io,
    /// API misuse, bad parameters, type mismatches
    Misuse,
    /// Unknown or unclassified errors
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Operational => write!(f, "Operational Error"),
            ErrorCategory::Constraint => write!(f, "Constraint Error"),
            ErrorCategory::Busy => write!(f, "Busy Error"),
            ErrorCategory::Io => write!(f, "I/O Error"),
            ErrorCategory::Misuse => write!(f, "Misuse Error"),
            ErrorCategory::Unknown => write!(f, "Error"),
        }
    }
}

/// Categorize a rusqlite error by its primary result code.
fn categorize(err: &rusqlite::Error) -> ErrorCategory {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::Unknown | ErrorCode::SchemaChanged => ErrorCategory::Operational,
            ErrorCode::ConstraintViolation => ErrorCategory::Constraint,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => ErrorCategory::Busy,
            ErrorCode::SystemIoFailure
            | ErrorCode::CannotOpen
            | ErrorCode::DiskFull
            | ErrorCode::ReadOnly
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::PermissionDenied
            | ErrorCode::FileLockingProtocolFailed
            | ErrorCode::NoLargeFileSupport => ErrorCategory::Io,
            ErrorCode::ApiMisuse
            | ErrorCode::TypeMismatch
            | ErrorCode::ParameterOutOfRange
            | ErrorCode::TooBig => ErrorCategory::Misuse,
            _ => ErrorCategory::Unknown,
        },
        rusqlite::Error::InvalidParameterCount(..)
        | rusqlite::Error::InvalidParameterName(_)
        | rusqlite::Error::ExecuteReturnedResults
        | rusqlite::Error::InvalidColumnIndex(_)
        | rusqlite::Error::InvalidColumnName(_) => ErrorCategory::Misuse,
        _ => ErrorCategory::Unknown,
    }
}
