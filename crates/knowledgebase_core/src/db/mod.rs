//! Knowledge base storage: connection setup and schema.
//!
//! Repositories receive a `&Connection` that already went through
//! [`open_db`] or [`open_db_in_memory`]; they never open or migrate on their own.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A connection is handed out only with foreign keys enforced, so category
//!   links cannot point at missing categories.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Schema version is current but a knowledge base table is gone.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "knowledge base schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingTable(table) => {
                write!(f, "knowledge base table `{table}` is missing")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
