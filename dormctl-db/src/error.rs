//! Error type for the data-access layer.

use dormctl_core::DormError;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Which storage constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

impl IntegrityKind {
    fn from_sqlx(kind: ErrorKind) -> Option<Self> {
        match kind {
            ErrorKind::UniqueViolation => Some(Self::Unique),
            ErrorKind::ForeignKeyViolation => Some(Self::ForeignKey),
            ErrorKind::NotNullViolation => Some(Self::NotNull),
            ErrorKind::CheckViolation => Some(Self::Check),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not null",
            Self::Check => "check",
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("could not connect to database '{database}' on {host}: {source}")]
    Connection {
        host: String,
        database: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("no open database session")]
    NotConnected,

    #[error("{}: {source}", describe_violation(.kind, .constraint))]
    Integrity {
        kind: IntegrityKind,
        constraint: Option<String>,
        #[source]
        source: sqlx::Error,
    },

    #[error("database error: {0}")]
    Query(#[source] sqlx::Error),

    #[error(transparent)]
    Input(#[from] DormError),
}

impl From<sqlx::Error> for DbError {
    /// Constraint violations surface as `Integrity`; everything else is `Query`.
    fn from(err: sqlx::Error) -> Self {
        let classified = err.as_database_error().and_then(|db_err| {
            IntegrityKind::from_sqlx(db_err.kind())
                .map(|kind| (kind, db_err.constraint().map(str::to_owned)))
        });

        match classified {
            Some((kind, constraint)) => DbError::Integrity {
                kind,
                constraint,
                source: err,
            },
            None => DbError::Query(err),
        }
    }
}

impl DbError {
    pub fn integrity_kind(&self) -> Option<IntegrityKind> {
        match self {
            DbError::Integrity { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn describe_violation(kind: &IntegrityKind, constraint: &Option<String>) -> String {
    match constraint {
        Some(name) => format!("{} constraint violated ({})", kind.as_str(), name),
        None => format!("{} constraint violated", kind.as_str()),
    }
}

pub type DbResult<T> = Result<T, DbError>;
