//! Update-item command handler: resolves category names, then replaces content.

use super::{resolve_categories, ItemPresenter, UpdateKnowledgeItemCommand, UseCase};
use crate::clock::Clock;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::item_repo::KnowledgeItemRepository;
use crate::service::category_service::CategoryService;
use crate::service::knowledge_item_service::{ItemContent, KnowledgeItemService};
use crate::service::ServiceResult;

/// Replaces the content of an item, creating any missing categories first.
pub struct UpdateKnowledgeItem<'s, CR, IR, C, P>
where
    CR: CategoryRepository,
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    categories: &'s CategoryService<CR>,
    items: &'s KnowledgeItemService<IR, C>,
    presenter: P,
}

impl<'s, CR, IR, C, P> UpdateKnowledgeItem<'s, CR, IR, C, P>
where
    CR: CategoryRepository,
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    pub fn new(
        categories: &'s CategoryService<CR>,
        items: &'s KnowledgeItemService<IR, C>,
        presenter: P,
    ) -> Self {
        Self {
            categories,
            items,
            presenter,
        }
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

impl<CR, IR, C, P> UseCase<UpdateKnowledgeItemCommand> for UpdateKnowledgeItem<'_, CR, IR, C, P>
where
    CR: CategoryRepository,
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    fn handle(&mut self, command: UpdateKnowledgeItemCommand) -> ServiceResult<()> {
        let categories = resolve_categories(self.categories, &command.categories)?;
        let content = ItemContent {
            title: command.title,
            anchor: command.anchor,
            data: command.data,
            tags: command.tags,
            categories,
        };

        let item = self.items.update_item(command.id, content)?;
        self.presenter.set_result(item);
        Ok(())
    }
}
