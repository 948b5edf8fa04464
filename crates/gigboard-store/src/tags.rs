use crate::{StoreError, StoreErrorCode};
use gigboard_model::TagId;
use rusqlite::{params, Connection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub id: TagId,
    pub tag_name: String,
}

/// Adds a skill tag to the vocabulary. Duplicate names surface as Conflict.
pub fn add_tag(conn: &Connection, tag_name: &str) -> Result<TagId, StoreError> {
    let trimmed = tag_name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::new(
            StoreErrorCode::Conflict,
            "tag name must not be empty",
        ));
    }
    conn.execute("INSERT INTO tags (tag_name) VALUES (?1)", params![trimmed])?;
    Ok(TagId::new(conn.last_insert_rowid()))
}

/// Removes a tag and every association pointing at it, in one transaction.
pub fn remove_tag(conn: &mut Connection, id: TagId) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM users_tags WHERE tag_id = ?1", params![id.get()])?;
    tx.execute("DELETE FROM posts_tags WHERE tag_id = ?1", params![id.get()])?;
    let changed = tx.execute("DELETE FROM tags WHERE id = ?1", params![id.get()])?;
    if changed == 0 {
        return Err(StoreError::not_found("tag"));
    }
    tx.commit()?;
    Ok(())
}

/// The whole vocabulary, sorted by name.
pub fn list_tags(conn: &Connection) -> Result<Vec<TagRecord>, StoreError> {
    let mut stmt = conn.prepare("SELECT id, tag_name FROM tags ORDER BY tag_name")?;
    let rows = stmt.query_map([], |row| {
        Ok(TagRecord {
            id: TagId::new(row.get(0)?),
            tag_name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
