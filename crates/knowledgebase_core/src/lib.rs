//! Core domain logic for the knowledge base.
//! This crate is the single source of truth for knowledge item and category
//! invariants, including the proficiency scoring rule.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod usecase;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryId};
pub use model::knowledge_item::{
    EpochMillis, ItemId, ItemStateError, KnowledgeItem, MAX_MARK, MAX_SCORE, MIN_MARK, MIN_SCORE,
};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::item_repo::{KnowledgeItemRepository, SqliteKnowledgeItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::knowledge_item_service::{ItemContent, KnowledgeItemService};
pub use service::validation::{ValidationError, ValidationPolicy};
pub use service::{ServiceError, ServiceResult};
pub use usecase::{
    AddKnowledgeItem, AddKnowledgeItemCommand, DeleteKnowledgeItem, DeleteKnowledgeItemCommand,
    DeletionPresenter, ItemPresenter, SetMarkToKnowledgeItem, SetMarkToKnowledgeItemCommand,
    UpdateKnowledgeItem, UpdateKnowledgeItemCommand, UseCase,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
