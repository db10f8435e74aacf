//! Set-mark command handler.
//!
//! # Invariants
//! - The presenter receives the rescored item only after it was saved.

use super::{ItemPresenter, SetMarkToKnowledgeItemCommand, UseCase};
use crate::clock::Clock;
use crate::repo::item_repo::KnowledgeItemRepository;
use crate::service::knowledge_item_service::KnowledgeItemService;
use crate::service::ServiceResult;

/// Records a self-test mark against one knowledge item.
pub struct SetMarkToKnowledgeItem<'s, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    items: &'s KnowledgeItemService<IR, C>,
    presenter: P,
}

impl<'s, IR, C, P> SetMarkToKnowledgeItem<'s, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    pub fn new(items: &'s KnowledgeItemService<IR, C>, presenter: P) -> Self {
        Self { items, presenter }
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }
}

impl<IR, C, P> UseCase<SetMarkToKnowledgeItemCommand> for SetMarkToKnowledgeItem<'_, IR, C, P>
where
    IR: KnowledgeItemRepository,
    C: Clock,
    P: ItemPresenter,
{
    fn handle(&mut self, command: SetMarkToKnowledgeItemCommand) -> ServiceResult<()> {
        let item = self.items.set_latest_mark(command.id, command.mark)?;
        self.presenter.set_result(item);
        Ok(())
    }
}
