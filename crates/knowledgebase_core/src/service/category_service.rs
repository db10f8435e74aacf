//! Category use-case service.
//!
//! # Responsibility
//! - Upsert categories by name (get-or-create).
//! - Delete categories by name.
//!
//! # Invariants
//! - An existing category is returned unchanged; no write happens.
//! - Name validation applies only to categories about to be created.
//! - A lost creation race (`CategoryExists`) is resolved by one lookup.

use crate::model::category::Category;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use crate::service::validation::{validate_category_name, ValidationPolicy};
use crate::service::{ServiceError, ServiceResult};
use log::{debug, info};

/// Category service facade over a category store.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
    policy: ValidationPolicy,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service with the default validation policy.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            policy: ValidationPolicy::default(),
        }
    }

    /// Replaces the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the category named `name`, creating it when absent.
    ///
    /// # Errors
    /// - `Validation(CategoryNameTooShort)` when a new name is too short.
    /// - `Repo(_)` for any store failure, unchanged.
    pub fn create_or_get_category(&self, name: &str) -> ServiceResult<Category> {
        if let Some(existing) = self.repo.find_by_name(name)? {
            debug!(
                "event=category_get module=service status=ok category_id={}",
                existing.id
            );
            return Ok(existing);
        }

        validate_category_name(&self.policy, name)?;

        let mut category = Category::new(name);
        match self.repo.create_category(&category) {
            Ok(id) => {
                category.id = id;
                info!("event=category_create module=service status=ok category_id={id}");
                Ok(category)
            }
            Err(RepoError::CategoryExists(conflict)) => {
                // Another writer inserted the name between lookup and insert.
                match self.repo.find_by_name(name)? {
                    Some(existing) => {
                        debug!(
                            "event=category_create module=service status=coalesced category_id={}",
                            existing.id
                        );
                        Ok(existing)
                    }
                    None => Err(RepoError::CategoryExists(conflict).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the category named `name`.
    ///
    /// # Errors
    /// - `CategoryNotFound` when no such category exists.
    /// - `Repo(_)` for any store failure, unchanged.
    pub fn delete_category(&self, name: &str) -> ServiceResult<()> {
        let category = self
            .repo
            .find_by_name(name)?
            .ok_or_else(|| ServiceError::CategoryNotFound(name.to_string()))?;

        self.repo.delete_category(&category)?;
        info!(
            "event=category_delete module=service status=ok category_id={}",
            category.id
        );
        Ok(())
    }
}
