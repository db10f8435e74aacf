use knowledgebase_core::db::open_db_in_memory;
use knowledgebase_core::{
    AddKnowledgeItem, AddKnowledgeItemCommand, CategoryRepository, CategoryService,
    DeleteKnowledgeItem, DeleteKnowledgeItemCommand, DeletionPresenter, FixedClock,
    ItemPresenter, KnowledgeItem, KnowledgeItemService, RepoError, ServiceError,
    SetMarkToKnowledgeItem, SetMarkToKnowledgeItemCommand, SqliteCategoryRepository,
    SqliteKnowledgeItemRepository, UpdateKnowledgeItem, UpdateKnowledgeItemCommand, UseCase,
    ValidationError,
};

const NOW: i64 = 1_700_000_000_000;

#[derive(Default)]
struct CapturedItem(Option<KnowledgeItem>);

impl ItemPresenter for CapturedItem {
    fn set_result(&mut self, item: KnowledgeItem) {
        self.0 = Some(item);
    }
}

#[derive(Default)]
struct CapturedDeletion(Option<bool>);

impl DeletionPresenter for CapturedDeletion {
    fn set_result(&mut self, deleted: bool) {
        self.0 = Some(deleted);
    }
}

fn add_command(categories: &[&str]) -> AddKnowledgeItemCommand {
    AddKnowledgeItemCommand {
        title: "Pattern matching".to_string(),
        anchor: "match".to_string(),
        data: "Exhaustive checks over enum variants.".to_string(),
        tags: vec!["enums".to_string()],
        categories: categories.iter().map(|name| name.to_string()).collect(),
    }
}

#[test]
fn add_creates_missing_categories_and_presents_item() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let items =
        KnowledgeItemService::with_clock(SqliteKnowledgeItemRepository::new(&conn), FixedClock(NOW));

    let mut first = AddKnowledgeItem::new(&categories, &items, CapturedItem::default());
    first.handle(add_command(&["rust", "syntax"])).unwrap();
    let first_item = first.into_presenter().0.unwrap();

    let mut second = AddKnowledgeItem::new(&categories, &items, CapturedItem::default());
    second.handle(add_command(&["syntax"])).unwrap();
    let second_item = second.into_presenter().0.unwrap();

    let names: Vec<&str> = first_item
        .categories
        .iter()
        .map(|category| category.name.as_str())
        .collect();
    assert_eq!(names, vec!["rust", "syntax"]);
    assert!(first_item.categories.iter().all(|category| category.id > 0));
    assert_eq!(second_item.categories[0], first_item.categories[1]);
    assert_eq!(first_item.created_at, Some(NOW));
    assert_ne!(first_item.id, second_item.id);
}

#[test]
fn add_with_short_category_name_presents_nothing() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let items = KnowledgeItemService::new(SqliteKnowledgeItemRepository::new(&conn));

    let mut presenter = CapturedItem::default();
    let mut use_case = AddKnowledgeItem::new(&categories, &items, &mut presenter);
    let err = use_case.handle(add_command(&["rust", "x"])).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::CategoryNameTooShort)
    ));
    assert!(presenter.0.is_none());
    // Categories resolved before the failure stay created.
    assert!(SqliteCategoryRepository::new(&conn)
        .find_by_name("rust")
        .unwrap()
        .is_some());
}

#[test]
fn update_resolves_categories_and_presents_updated_item() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let items =
        KnowledgeItemService::with_clock(SqliteKnowledgeItemRepository::new(&conn), FixedClock(NOW));

    let mut add = AddKnowledgeItem::new(&categories, &items, CapturedItem::default());
    add.handle(add_command(&["rust"])).unwrap();
    let created = add.into_presenter().0.unwrap();

    let command: UpdateKnowledgeItemCommand = serde_json::from_value(serde_json::json!({
        "id": created.id,
        "title": "Pattern matching 2",
        "anchor": "match2",
        "data": "Guards refine arms with boolean checks.",
        "categories": ["control flow"]
    }))
    .unwrap();

    let mut update = UpdateKnowledgeItem::new(&categories, &items, CapturedItem::default());
    update.handle(command).unwrap();
    let updated = update.into_presenter().0.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.anchor, "match2");
    assert!(updated.tags.is_empty());
    assert_eq!(updated.categories.len(), 1);
    assert_eq!(updated.categories[0].name, "control flow");
    assert_eq!(updated.updated_at, Some(NOW));
}

#[test]
fn set_mark_presents_scored_item() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let items = KnowledgeItemService::new(SqliteKnowledgeItemRepository::new(&conn));

    let mut add = AddKnowledgeItem::new(&categories, &items, CapturedItem::default());
    add.handle(add_command(&[])).unwrap();
    let created = add.into_presenter().0.unwrap();

    let mut presenter = CapturedItem::default();
    let mut set_mark = SetMarkToKnowledgeItem::new(&items, &mut presenter);
    set_mark
        .handle(SetMarkToKnowledgeItemCommand {
            id: created.id,
            mark: 7,
        })
        .unwrap();
    let err = set_mark
        .handle(SetMarkToKnowledgeItemCommand {
            id: created.id,
            mark: 11,
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::MarkTooHigh(11))
    ));
    let scored = presenter.0.unwrap();
    assert_eq!((scored.score, scored.last_mark), (7, 7));
    assert!(scored.last_check_at.is_some());
}

#[test]
fn delete_presents_true_then_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let categories = CategoryService::new(SqliteCategoryRepository::new(&conn));
    let items = KnowledgeItemService::new(SqliteKnowledgeItemRepository::new(&conn));

    let mut add = AddKnowledgeItem::new(&categories, &items, CapturedItem::default());
    add.handle(add_command(&["rust"])).unwrap();
    let created = add.into_presenter().0.unwrap();

    let mut delete = DeleteKnowledgeItem::new(&items, CapturedDeletion::default());
    delete
        .handle(DeleteKnowledgeItemCommand { id: created.id })
        .unwrap();
    assert_eq!(delete.into_presenter().0, Some(true));

    let mut again = DeleteKnowledgeItem::new(&items, CapturedDeletion::default());
    let err = again
        .handle(DeleteKnowledgeItemCommand { id: created.id })
        .unwrap_err();
    assert!(matches!(err.repo_error(), Some(RepoError::ItemNotFound(_))));
    assert_eq!(again.into_presenter().0, None);
}
