//! Category store contract and SQLite implementation.
//!
//! # Invariants
//! - Names are unique; a duplicate insert fails with `CategoryExists`.
//! - Deleting a category still referenced by an item is refused by the
//!   foreign key and surfaces as `RepoError::Db`.

use crate::model::category::{Category, CategoryId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Persistence capabilities required by the category service.
pub trait CategoryRepository {
    /// Looks a category up by exact name. `Ok(None)` when absent.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>>;
    /// Inserts a new category and returns the generated identifier.
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn delete_category(&self, category: &Category) -> RepoResult<()>;
}

impl<R: CategoryRepository + ?Sized> CategoryRepository for &R {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        (**self).find_by_name(name)
    }

    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        (**self).create_category(category)
    }

    fn delete_category(&self, category: &Category) -> RepoResult<()> {
        (**self).delete_category(category)
    }
}

/// SQLite-backed category store.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE name = ?1;",
                [name],
                |row| {
                    Ok(Category {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        match self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1);",
            params![category.name.as_str()],
        ) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::CategoryExists(category.name.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_category(&self, category: &Category) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [category.id])?;

        if changed == 0 {
            return Err(RepoError::CategoryNotFound(category.id));
        }

        Ok(())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
