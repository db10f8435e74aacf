//! Category domain model.
//!
//! # Responsibility
//! - Describe the named grouping label referenced by knowledge items.
//!
//! # Invariants
//! - `name` is unique inside a store; uniqueness is enforced by the store.
//! - A category is never mutated after creation.

use serde::{Deserialize, Serialize};

/// Store-assigned category identifier. `0` means "not persisted".
pub type CategoryId = i64;

/// Named grouping label for knowledge items.
///
/// `Category::default()` is the empty reference: no name and no identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Creates a category value that has not been persisted yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    /// Returns whether the store has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Returns whether this is an empty reference (no name).
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}
