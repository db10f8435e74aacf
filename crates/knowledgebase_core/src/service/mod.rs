//! Domain services: every business rule of the knowledge base lives here.
//!
//! # Responsibility
//! - Validate input, stamp timestamps, apply scoring, then persist.
//! - Keep use cases and adapters free of rules.
//!
//! # Invariants
//! - Validation failures are returned before any store call.
//! - Store errors propagate unchanged inside `ServiceError::Repo`.
//! - No in-process locking; concurrent writers are arbitrated by the store.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_service;
pub mod knowledge_item_service;
pub mod scoring;
pub mod validation;

use validation::ValidationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by domain services.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    /// No category with this name exists.
    CategoryNotFound(String),
    /// Store failure, including store-reported not-found.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns the underlying store error, if any.
    pub fn repo_error(&self) -> Option<&RepoError> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CategoryNotFound(name) => write!(f, "category not exists: `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::CategoryNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
