//! Input validation shared by the category and knowledge item services.
//!
//! # Invariants
//! - Checks run in a fixed order and the first failure wins:
//!   title, anchor, data, tags (list order), categories (list order).
//! - Validation is pure: it never touches a store.
//! - Lengths count Unicode scalar values, and must strictly exceed the
//!   policy minimum.

use crate::model::category::Category;
use crate::model::knowledge_item::{MAX_MARK, MIN_MARK};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Minimum-length thresholds. A value is accepted when its length is
/// strictly greater than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub min_title_len: usize,
    pub min_anchor_len: usize,
    pub min_data_len: usize,
    pub min_tag_len: usize,
    pub min_category_name_len: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_title_len: 3,
            min_anchor_len: 3,
            min_data_len: 15,
            min_tag_len: 1,
            min_category_name_len: 1,
        }
    }
}

/// Deterministic, input-derived rejection. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TitleTooShort,
    AnchorTooShort,
    DataTooShort,
    /// Carries the first offending tag.
    TagTooShort(String),
    EmptyCategory,
    /// Category reference was never persisted; carries its name.
    UnknownCategory(String),
    CategoryNameTooShort,
    MarkTooLow(i64),
    MarkTooHigh(i64),
    /// Mutation requested on an item with identifier `0`.
    ItemNotPersisted,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooShort => write!(f, "title is too short"),
            Self::AnchorTooShort => write!(f, "anchor is too short"),
            Self::DataTooShort => write!(f, "data is too short"),
            Self::TagTooShort(_) => write!(f, "tag is too short"),
            Self::EmptyCategory => write!(f, "category cannot be empty"),
            Self::UnknownCategory(_) => write!(f, "category doesn't exist"),
            Self::CategoryNameTooShort => write!(f, "category name is too short"),
            Self::MarkTooLow(_) => write!(f, "mark cannot be less than {MIN_MARK}"),
            Self::MarkTooHigh(_) => write!(f, "mark cannot be more than {MAX_MARK}"),
            Self::ItemNotPersisted => write!(f, "provided knowledge item doesn't exist"),
        }
    }
}

impl Error for ValidationError {}

/// Validates the editable content of a knowledge item.
pub fn validate_item_fields(
    policy: &ValidationPolicy,
    title: &str,
    anchor: &str,
    data: &str,
    tags: &[String],
    categories: &[Category],
) -> Result<(), ValidationError> {
    if !longer_than(title, policy.min_title_len) {
        return Err(ValidationError::TitleTooShort);
    }
    if !longer_than(anchor, policy.min_anchor_len) {
        return Err(ValidationError::AnchorTooShort);
    }
    if !longer_than(data, policy.min_data_len) {
        return Err(ValidationError::DataTooShort);
    }

    if let Some(tag) = tags.iter().find(|tag| !longer_than(tag, policy.min_tag_len)) {
        return Err(ValidationError::TagTooShort(tag.clone()));
    }

    for category in categories {
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if !category.is_persisted() {
            return Err(ValidationError::UnknownCategory(category.name.clone()));
        }
    }

    Ok(())
}

/// Validates a name for a category that is about to be created.
pub fn validate_category_name(
    policy: &ValidationPolicy,
    name: &str,
) -> Result<(), ValidationError> {
    if longer_than(name, policy.min_category_name_len) {
        Ok(())
    } else {
        Err(ValidationError::CategoryNameTooShort)
    }
}

/// Validates a self-test mark against `[MIN_MARK, MAX_MARK]`.
pub fn validate_mark(mark: i64) -> Result<(), ValidationError> {
    if mark < MIN_MARK {
        return Err(ValidationError::MarkTooLow(mark));
    }
    if mark > MAX_MARK {
        return Err(ValidationError::MarkTooHigh(mark));
    }
    Ok(())
}

fn longer_than(value: &str, min_len: usize) -> bool {
    value.chars().count() > min_len
}
