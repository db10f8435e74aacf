//! Delete-item command handler.

use super::{DeleteKnowledgeItemCommand, DeletionPresenter, UseCase};
use crate::clock::Clock;
use crate::repo::item_repo::KnowledgeItemRepository;
use crate::service::knowledge_item_service::KnowledgeItemService;
use crate::service::ServiceResult;

/// Deletes one knowledge item by id.
pub struct DeleteKnowledgeItem<'s, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: DeletionPresenter,
{
    items: &'s KnowledgeItemService<IR, C>,
    presenter: P,
}

impl<'s, IR, C, P> DeleteKnowledgeItem<'s, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: DeletionPresenter,
{
    pub fn new(items: &'s KnowledgeItemService<IR, C>, presenter: P) -> Self {
        Self { items, presenter }
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

impl<IR, C, P> UseCase<DeleteKnowledgeItemCommand> for DeleteKnowledgeItem<'_, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: DeletionPresenter,
{
    fn handle(&mut self, command: DeleteKnowledgeItemCommand) -> ServiceResult<()> {
        self.items.delete_item(command.id)?;
        self.presenter.set_result(true);
        Ok(())
    }
}
