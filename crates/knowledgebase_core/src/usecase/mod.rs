//! Command use cases: sequencing only, no business rules.
//!
//! # Responsibility
//! - Resolve category names through `CategoryService`.
//! - Forward one command to `KnowledgeItemService`.
//! - Hand the result to the caller-supplied presenter.
//!
//! # Invariants
//! - The presenter is called only after the whole command succeeded.
//! - The first failing step short-circuits the command.

use crate::model::category::Category;
use crate::model::knowledge_item::KnowledgeItem;
use crate::repo::category_repo::CategoryRepository;
use crate::service::category_service::CategoryService;
use crate::service::ServiceResult;
use serde::Deserialize;

mod add_item;
mod delete_item;
mod set_mark;
mod update_item;

pub use add_item::AddKnowledgeItem;
pub use delete_item::DeleteKnowledgeItem;
pub use set_mark::SetMarkToKnowledgeItem;
pub use update_item::UpdateKnowledgeItem;

/// One command handler.
pub trait UseCase<Command> {
    fn handle(&mut self, command: Command) -> ServiceResult<()>;
}

/// Output port for use cases that produce an item.
pub trait ItemPresenter {
    fn set_result(&mut self, item: KnowledgeItem);
}

/// Output port for the delete use case.
pub trait DeletionPresenter {
    fn set_result(&mut self, deleted: bool);
}

impl<P: ItemPresenter + ?Sized> ItemPresenter for &mut P {
    fn set_result(&mut self, item: KnowledgeItem) {
        (**self).set_result(item);
    }
}

impl<P: DeletionPresenter + ?Sized> DeletionPresenter for &mut P {
    fn set_result(&mut self, deleted: bool) {
        (**self).set_result(deleted);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddKnowledgeItemCommand {
    pub title: String,
    pub anchor: String,
    pub data: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category names; missing categories are created.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateKnowledgeItemCommand {
    pub id: i64,
    pub title: String,
    pub anchor: String,
    pub data: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteKnowledgeItemCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SetMarkToKnowledgeItemCommand {
    pub id: i64,
    pub mark: i64,
}

/// Gets or creates every named category, preserving order.
fn resolve_categories<R: CategoryRepository>(
    service: &CategoryService<R>,
    names: &[String],
) -> ServiceResult<Vec<Category>> {
    names
        .iter()
        .map(|name| service.create_or_get_category(name))
        .collect()
}
