//! Knowledge item domain model.
//!
//! # Responsibility
//! - Define the learnable unit (title, anchor, body, tags, categories).
//! - Carry the running proficiency state (`score`, `last_mark`).
//!
//! # Invariants
//! - `score` stays within `[MIN_SCORE, MAX_SCORE]`.
//! - `last_mark` stays within `[MIN_MARK, MAX_MARK]`.
//! - `id == 0` means the item was never persisted.
//! - `created_at` is set once; `updated_at` changes on content updates only.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned knowledge item identifier. `0` means "not persisted".
pub type ItemId = i64;

/// Unix epoch milliseconds.
pub type EpochMillis = i64;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;
pub const MIN_MARK: i64 = 0;
pub const MAX_MARK: i64 = 10;

/// Range violations on proficiency state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStateError {
    ScoreOutOfRange(i64),
    LastMarkOutOfRange(i64),
}

impl Display for ItemStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScoreOutOfRange(value) => write!(
                f,
                "score ({value}) must be within [{MIN_SCORE}, {MAX_SCORE}]"
            ),
            Self::LastMarkOutOfRange(value) => write!(
                f,
                "last_mark ({value}) must be within [{MIN_MARK}, {MAX_MARK}]"
            ),
        }
    }
}

impl Error for ItemStateError {}

/// One learnable piece of knowledge plus its self-test state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: ItemId,
    pub title: String,
    /// Short mnemonic label, distinct from `title`.
    pub anchor: String,
    /// Body text. Serialized as `description` to match the external schema.
    #[serde(rename = "description")]
    pub data: String,
    /// Shared references; the item does not control category lifecycle.
    pub categories: Vec<Category>,
    /// Ordered as given by the caller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub score: i64,
    /// Most recent self-test result.
    pub last_mark: i64,
    pub last_check_at: Option<EpochMillis>,
    pub created_at: Option<EpochMillis>,
    pub updated_at: Option<EpochMillis>,
}

impl KnowledgeItem {
    /// Creates an unpersisted item with zeroed proficiency state.
    pub fn new(
        title: impl Into<String>,
        anchor: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            data: data.into(),
            ..Self::default()
        }
    }

    /// Returns whether the store has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Checks the proficiency range invariants.
    pub fn validate(&self) -> Result<(), ItemStateError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(ItemStateError::ScoreOutOfRange(self.score));
        }
        if !(MIN_MARK..=MAX_MARK).contains(&self.last_mark) {
            return Err(ItemStateError::LastMarkOutOfRange(self.last_mark));
        }
        Ok(())
    }
}
