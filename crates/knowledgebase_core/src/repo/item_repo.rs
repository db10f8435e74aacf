//! Knowledge item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist items together with their ordered tags and category links.
//! - Report absent items as `RepoError::ItemNotFound`.
//!
//! # Invariants
//! - Write paths call `KnowledgeItem::validate()` before any SQL mutation.
//! - Read paths reject persisted rows that violate range invariants.
//! - Every write runs in a single transaction; link rows are fully replaced.

use crate::model::category::Category;
use crate::model::knowledge_item::{ItemId, KnowledgeItem};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    title,
    anchor,
    data,
    score,
    last_mark,
    last_check_at,
    created_at,
    updated_at
FROM knowledge_items";

/// Persistence capabilities required by the knowledge item service.
pub trait KnowledgeItemRepository {
    /// Inserts a new item and returns the generated identifier.
    fn create_item(&self, item: &KnowledgeItem) -> RepoResult<ItemId>;
    /// Overwrites an existing item, including its tags and category links.
    fn save_item(&self, item: &KnowledgeItem) -> RepoResult<()>;
    fn delete_item(&self, item: &KnowledgeItem) -> RepoResult<()>;
    /// Loads one item. Fails with `ItemNotFound` when absent.
    fn find_by_id(&self, id: ItemId) -> RepoResult<KnowledgeItem>;
}

impl<R: KnowledgeItemRepository + ?Sized> KnowledgeItemRepository for &R {
    fn create_item(&self, item: &KnowledgeItem) -> RepoResult<ItemId> {
        (**self).create_item(item)
    }

    fn save_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
        (**self).save_item(item)
    }

    fn delete_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
        (**self).delete_item(item)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<KnowledgeItem> {
        (**self).find_by_id(id)
    }
}

/// SQLite-backed knowledge item store.
pub struct SqliteKnowledgeItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKnowledgeItemRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KnowledgeItemRepository for SqliteKnowledgeItemRepository<'_> {
    fn create_item(&self, item: &KnowledgeItem) -> RepoResult<ItemId> {
        item.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO knowledge_items (
                title,
                anchor,
                data,
                score,
                last_mark,
                last_check_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                item.title.as_str(),
                item.anchor.as_str(),
                item.data.as_str(),
                item.score,
                item.last_mark,
                item.last_check_at,
                item.created_at,
                item.updated_at,
            ],
        )?;
        let id = tx.last_insert_rowid();
        write_links(&tx, id, item)?;
        tx.commit()?;

        Ok(id)
    }

    fn save_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
        item.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE knowledge_items
             SET
                title = ?1,
                anchor = ?2,
                data = ?3,
                score = ?4,
                last_mark = ?5,
                last_check_at = ?6,
                created_at = ?7,
                updated_at = ?8
             WHERE id = ?9;",
            params![
                item.title.as_str(),
                item.anchor.as_str(),
                item.data.as_str(),
                item.score,
                item.last_mark,
                item.last_check_at,
                item.created_at,
                item.updated_at,
                item.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item.id));
        }

        tx.execute(
            "DELETE FROM knowledge_item_tags WHERE item_id = ?1;",
            [item.id],
        )?;
        tx.execute(
            "DELETE FROM knowledge_item_categories WHERE item_id = ?1;",
            [item.id],
        )?;
        write_links(&tx, item.id, item)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_item(&self, item: &KnowledgeItem) -> RepoResult<()> {
        // Tag and category link rows go with the item (ON DELETE CASCADE).
        let changed = self
            .conn
            .execute("DELETE FROM knowledge_items WHERE id = ?1;", [item.id])?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item.id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<KnowledgeItem> {
        let mut item = self
            .conn
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_item_row,
            )
            .optional()?
            .ok_or(RepoError::ItemNotFound(id))?;

        item.tags = load_tags(self.conn, id)?;
        item.categories = load_categories(self.conn, id)?;

        item.validate().map_err(|err| {
            RepoError::InvalidData(format!("knowledge item {id} violates invariants: {err}"))
        })?;
        Ok(item)
    }
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<KnowledgeItem> {
    Ok(KnowledgeItem {
        id: row.get("id")?,
        title: row.get("title")?,
        anchor: row.get("anchor")?,
        data: row.get("data")?,
        categories: Vec::new(),
        tags: Vec::new(),
        score: row.get("score")?,
        last_mark: row.get("last_mark")?,
        last_check_at: row.get("last_check_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn write_links(conn: &Connection, item_id: ItemId, item: &KnowledgeItem) -> RepoResult<()> {
    for (position, tag) in item.tags.iter().enumerate() {
        conn.execute(
            "INSERT INTO knowledge_item_tags (item_id, position, tag) VALUES (?1, ?2, ?3);",
            params![item_id, position as i64, tag.as_str()],
        )?;
    }

    for (position, category) in item.categories.iter().enumerate() {
        conn.execute(
            "INSERT INTO knowledge_item_categories (item_id, category_id, position)
             VALUES (?1, ?2, ?3);",
            params![item_id, category.id, position as i64],
        )?;
    }

    Ok(())
}

fn load_tags(conn: &Connection, item_id: ItemId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM knowledge_item_tags
         WHERE item_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([item_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn load_categories(conn: &Connection, item_id: ItemId) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.name
         FROM knowledge_item_categories ic
         INNER JOIN categories c ON c.id = ic.category_id
         WHERE ic.item_id = ?1
         ORDER BY ic.position ASC;",
    )?;
    let mut rows = stmt.query([item_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category {
            id: row.get(0)?,
            name: row.get(1)?,
        });
    }
    Ok(categories)
}
