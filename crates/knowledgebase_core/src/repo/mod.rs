//! Store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence capabilities domain services depend on.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Stores are dumb: no business rules beyond uniqueness and range checks.
//! - Absent rows surface as semantic errors (`ItemNotFound`), duplicate
//!   category names as `CategoryExists`, so services can react to them.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::knowledge_item::{ItemId, ItemStateError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod item_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error shared by category and knowledge item repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Item state violates range invariants; the write was not attempted.
    InvalidState(ItemStateError),
    Db(DbError),
    ItemNotFound(ItemId),
    CategoryNotFound(CategoryId),
    /// A category with this name is already stored.
    CategoryExists(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidState(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::ItemNotFound(id) => write!(f, "knowledge item not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::CategoryExists(name) => write!(f, "category already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidState(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemStateError> for RepoError {
    fn from(value: ItemStateError) -> Self {
        Self::InvalidState(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
