//! Knowledge item use-case service.
//!
//! # Responsibility
//! - Create, update and delete knowledge items.
//! - Record self-test marks and maintain the proficiency score.
//!
//! # Invariants
//! - Input is validated before any store call; a failed call leaves nothing
//!   persisted and returns no partially mutated item.
//! - Identifier `0` is rejected by every operation except `new_item`.
//! - `update_item` never touches `score`, `last_mark` or `created_at`.
//! - Store errors, including not-found, are returned unchanged.

use crate::clock::{Clock, SystemClock};
use crate::model::category::Category;
use crate::model::knowledge_item::{ItemId, KnowledgeItem};
use crate::repo::item_repo::KnowledgeItemRepository;
use crate::service::scoring::apply_mark;
use crate::service::validation::{
    validate_item_fields, validate_mark, ValidationError, ValidationPolicy,
};
use crate::service::ServiceResult;
use log::info;

/// Editable content of a knowledge item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemContent {
    pub title: String,
    pub anchor: String,
    pub data: String,
    pub tags: Vec<String>,
    /// Must already be persisted (see `CategoryService`).
    pub categories: Vec<Category>,
}

impl ItemContent {
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

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    fn validate(&self, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        validate_item_fields(
            policy,
            &self.title,
            &self.anchor,
            &self.data,
            &self.tags,
            &self.categories,
        )
    }
}

/// Knowledge item service facade over an item store.
pub struct KnowledgeItemService<R: KnowledgeItemRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    policy: ValidationPolicy,
}

impl<R: KnowledgeItemRepository> KnowledgeItemService<R> {
    /// Creates a service that stamps wall-clock time.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: KnowledgeItemRepository, C: Clock> KnowledgeItemService<R, C> {
    /// Creates a service reading time from `clock`.
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            policy: ValidationPolicy::default(),
        }
    }

    /// Replaces the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates and persists a new item.
    ///
    /// The returned item carries the generated id, `created_at = now` and
    /// zeroed proficiency state.
    pub fn new_item(&self, content: ItemContent) -> ServiceResult<KnowledgeItem> {
        content.validate(&self.policy)?;

        let mut item = KnowledgeItem {
            title: content.title,
            anchor: content.anchor,
            data: content.data,
            tags: content.tags,
            categories: content.categories,
            created_at: Some(self.clock.now_millis()),
            ..KnowledgeItem::default()
        };
        item.id = self.repo.create_item(&item)?;

        info!(
            "event=item_create module=service status=ok item_id={} tags={} categories={}",
            item.id,
            item.tags.len(),
            item.categories.len()
        );
        Ok(item)
    }

    /// Replaces the content of an existing item and stamps `updated_at`.
    pub fn update_item(&self, id: ItemId, content: ItemContent) -> ServiceResult<KnowledgeItem> {
        ensure_persisted(id)?;
        content.validate(&self.policy)?;

        let mut item = self.repo.find_by_id(id)?;
        item.title = content.title;
        item.anchor = content.anchor;
        item.data = content.data;
        item.tags = content.tags;
        item.categories = content.categories;
        item.updated_at = Some(self.clock.now_millis());
        self.repo.save_item(&item)?;

        info!("event=item_update module=service status=ok item_id={id}");
        Ok(item)
    }

    /// Deletes an existing item.
    pub fn delete_item(&self, id: ItemId) -> ServiceResult<()> {
        ensure_persisted(id)?;

        let item = self.repo.find_by_id(id)?;
        self.repo.delete_item(&item)?;

        info!("event=item_delete module=service status=ok item_id={id}");
        Ok(())
    }

    /// Records a self-test mark and updates the score.
    ///
    /// # Errors
    /// - `MarkTooLow` / `MarkTooHigh` before any store call.
    /// - `Repo(ItemNotFound)` when the store has no such item.
    pub fn set_latest_mark(&self, id: ItemId, mark: i64) -> ServiceResult<KnowledgeItem> {
        validate_mark(mark)?;
        ensure_persisted(id)?;

        let mut item = self.repo.find_by_id(id)?;
        let previous_score = item.score;
        item.last_check_at = Some(self.clock.now_millis());
        apply_mark(&mut item, mark);
        self.repo.save_item(&item)?;

        info!(
            "event=item_mark module=service status=ok item_id={id} mark={mark} score_before={previous_score} score_after={}",
            item.score
        );
        Ok(item)
    }

    /// Loads one item by id.
    pub fn get_item(&self, id: ItemId) -> ServiceResult<KnowledgeItem> {
        Ok(self.repo.find_by_id(id)?)
    }
}

fn ensure_persisted(id: ItemId) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::ItemNotPersisted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ItemContent, KnowledgeItemService};
    use crate::clock::FixedClock;
    use crate::model::category::Category;
    use crate::model::knowledge_item::{ItemId, KnowledgeItem};
    use crate::repo::item_repo::KnowledgeItemRepository;
    use crate::repo::{RepoError, RepoResult};
    use crate::service::validation::ValidationError;
    use crate::service::ServiceError;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    const NOW: i64 = 1_700_000_000_000;
    const LATER: i64 = 1_700_000_600_000;

    /// In-memory store that records every call.
    #[derive(Default)]
    struct RecordingStore {
        rows: RefCell<BTreeMap<ItemId, KnowledgeItem>>,
        calls: RefCell<Vec<&'static str>>,
        next_id: Cell<ItemId>,
        fail_save: Cell<bool>,
    }

    impl RecordingStore {
        fn with_item(item: KnowledgeItem) -> Self {
            let store = Self::default();
            store.next_id.set(item.id);
            store.rows.borrow_mut().insert(item.id, item);
            store
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }

        fn stored(&self, id: ItemId) -> Option<KnowledgeItem> {
            self.rows.borrow().get(&id).cloned()
        }
    }

    impl KnowledgeItemRepository for RecordingStore {
        fn create_item(&self, item: &KnowledgeItem) -> RepoResult<ItemId> {
            self.calls.borrow_mut().push("create");
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            let mut stored = item.clone();
            stored.id = id;
            self.rows.borrow_mut().insert(id, stored);
            Ok(id)
        }

        fn save_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
            self.calls.borrow_mut().push("save");
            if self.fail_save.get() {
                return Err(RepoError::InvalidData("disk full".to_string()));
            }
            self.rows.borrow_mut().insert(item.id, item.clone());
            Ok(())
        }

        fn delete_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
            self.calls.borrow_mut().push("delete");
            self.rows
                .borrow_mut()
                .remove(&item.id)
                .map(|_| ())
                .ok_or(RepoError::ItemNotFound(item.id))
        }

        fn find_by_id(&self, id: ItemId) -> RepoResult<KnowledgeItem> {
            self.calls.borrow_mut().push("find");
            self.stored(id).ok_or(RepoError::ItemNotFound(id))
        }
    }

    fn rust_category() -> Category {
        Category {
            id: 1,
            name: "rust".to_string(),
        }
    }

    fn valid_content() -> ItemContent {
        ItemContent::new("Lifetimes", "ltms", "References must not outlive data.")
            .with_tags(["borrowck", "refs"])
            .with_categories(vec![rust_category()])
    }

    fn stored_item(score: i64, last_mark: i64) -> KnowledgeItem {
        KnowledgeItem {
            id: 5,
            title: "Lifetimes".to_string(),
            anchor: "ltms".to_string(),
            data: "References must not outlive data.".to_string(),
            tags: vec!["borrowck".to_string()],
            categories: vec![rust_category()],
            score,
            last_mark,
            created_at: Some(NOW),
            ..KnowledgeItem::default()
        }
    }

    #[test]
    fn new_item_persists_with_zeroed_state() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let item = service.new_item(valid_content()).unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.score, 0);
        assert_eq!(item.last_mark, 0);
        assert_eq!(item.created_at, Some(NOW));
        assert_eq!(item.updated_at, None);
        assert_eq!(item.last_check_at, None);
        assert_eq!(item.tags, vec!["borrowck".to_string(), "refs".to_string()]);
        assert_eq!(store.calls(), vec!["create"]);
        assert_eq!(store.stored(1), Some(item));
    }

    #[test]
    fn new_item_validation_failure_skips_store() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let content = valid_content().with_categories(vec![Category::new("unsaved")]);
        let err = service.new_item(content).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UnknownCategory(_))
        ));
        assert_eq!(err.to_string(), "category doesn't exist");
        assert!(store.calls().is_empty());
    }

    #[test]
    fn anchor_must_be_longer_than_three_chars() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let err = service
            .new_item(ItemContent::new("Lifetimes", "ltm", "References must not outlive data."))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::AnchorTooShort)
        ));
        assert!(store.calls().is_empty());

        service
            .new_item(ItemContent::new("Lifetimes", "ltms", "References must not outlive data."))
            .unwrap();
        assert_eq!(store.calls(), vec!["create"]);
    }

    #[test]
    fn update_item_replaces_content_and_keeps_score() {
        let store = RecordingStore::with_item(stored_item(40, 6));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(LATER));

        let content = ItemContent::new("Lifetimes 2", "ltm2", "Elision rules cover most cases.")
            .with_tags(["elision"]);
        let item = service.update_item(5, content).unwrap();

        assert_eq!(item.title, "Lifetimes 2");
        assert_eq!(item.anchor, "ltm2");
        assert_eq!(item.tags, vec!["elision".to_string()]);
        assert!(item.categories.is_empty());
        assert_eq!(item.updated_at, Some(LATER));
        assert_eq!(item.created_at, Some(NOW));
        assert_eq!((item.score, item.last_mark), (40, 6));
        assert_eq!(store.calls(), vec!["find", "save"]);
        assert_eq!(store.stored(5), Some(item));
    }

    #[test]
    fn update_missing_item_surfaces_store_not_found() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let err = service.update_item(99, valid_content()).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::ItemNotFound(99))));
        assert_eq!(store.calls(), vec!["find"]);
    }

    #[test]
    fn update_with_invalid_content_leaves_item_untouched() {
        let store = RecordingStore::with_item(stored_item(40, 6));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(LATER));

        let err = service
            .update_item(5, ItemContent::new("ok title", "ok anchor", "short"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::DataTooShort)
        ));
        assert!(store.calls().is_empty());
        assert_eq!(store.stored(5), Some(stored_item(40, 6)));
    }

    #[test]
    fn unpersisted_id_is_rejected_everywhere() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        for err in [
            service.update_item(0, valid_content()).unwrap_err(),
            service.delete_item(0).unwrap_err(),
            service.set_latest_mark(0, 5).unwrap_err(),
        ] {
            assert!(matches!(
                err,
                ServiceError::Validation(ValidationError::ItemNotPersisted)
            ));
        }
        assert!(store.calls().is_empty());
    }

    #[test]
    fn delete_item_looks_up_then_deletes() {
        let store = RecordingStore::with_item(stored_item(0, 0));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        service.delete_item(5).unwrap();
        assert_eq!(store.calls(), vec!["find", "delete"]);
        assert_eq!(store.stored(5), None);

        let err = service.delete_item(5).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::ItemNotFound(5))));
        assert_eq!(store.calls(), vec!["find", "delete", "find"]);
    }

    #[test]
    fn set_latest_mark_applies_scoring_and_stamps_check_time() {
        let cases = [(6, 31, 6), (4, 24, 4), (5, 30, 5), (0, 0, 0)];
        for (mark, expected_score, expected_last_mark) in cases {
            let store = RecordingStore::with_item(stored_item(25, 5));
            let service = KnowledgeItemService::with_clock(&store, FixedClock(LATER));

            let item = service.set_latest_mark(5, mark).unwrap();
            assert_eq!(
                (item.score, item.last_mark),
                (expected_score, expected_last_mark),
                "mark {mark}"
            );
            assert_eq!(item.last_check_at, Some(LATER));
            assert_eq!(item.updated_at, None);
            assert_eq!(store.stored(5), Some(item));
        }
    }

    #[test]
    fn set_latest_mark_clamps_score() {
        let store = RecordingStore::with_item(stored_item(1, 4));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));
        assert_eq!(service.set_latest_mark(5, 1).unwrap().score, 0);

        let store = RecordingStore::with_item(stored_item(95, 7));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));
        assert_eq!(service.set_latest_mark(5, 10).unwrap().score, 100);
    }

    #[test]
    fn out_of_range_mark_is_rejected_before_store() {
        let store = RecordingStore::with_item(stored_item(25, 5));
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let low = service.set_latest_mark(5, -1).unwrap_err();
        let high = service.set_latest_mark(5, 11).unwrap_err();
        assert!(matches!(
            low,
            ServiceError::Validation(ValidationError::MarkTooLow(-1))
        ));
        assert!(matches!(
            high,
            ServiceError::Validation(ValidationError::MarkTooHigh(11))
        ));
        assert_ne!(low.to_string(), high.to_string());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn set_mark_on_missing_item_surfaces_not_found() {
        let store = RecordingStore::default();
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let err = service.set_latest_mark(12, 3).unwrap_err();
        assert!(matches!(err.repo_error(), Some(RepoError::ItemNotFound(12))));
        assert_eq!(store.calls(), vec!["find"]);
    }

    #[test]
    fn save_failure_propagates_unchanged() {
        let store = RecordingStore::with_item(stored_item(25, 5));
        store.fail_save.set(true);
        let service = KnowledgeItemService::with_clock(&store, FixedClock(NOW));

        let err = service.set_latest_mark(5, 6).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Repo(RepoError::InvalidData(ref message)) if message == "disk full"
        ));
        assert_eq!(store.stored(5), Some(stored_item(25, 5)));
    }
}
