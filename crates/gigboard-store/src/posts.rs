use crate::tags::TagRecord;
use crate::StoreError;
use gigboard_model::{PostId, Region, TagId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Grace period before a dated gig is considered expired.
pub const EXPIRY_GRACE_SECS: i64 = 2 * 86_400;

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: UserId,
    pub post_title: String,
    pub description: String,
    pub creation_date: i64,
    pub gig_date_start: Option<i64>,
    pub gig_date_end: Option<i64>,
    pub unpaid: bool,
    pub pay: Option<i64>,
    pub ishourly: bool,
    pub zipcode: String,
    pub tags: Vec<TagId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub id: PostId,
    pub user_id: UserId,
    pub post_title: String,
    pub description: String,
    pub creation_date: i64,
    pub gig_date_start: Option<i64>,
    pub gig_date_end: Option<i64>,
    pub unpaid: bool,
    pub pay: Option<i64>,
    pub ishourly: bool,
    pub active: bool,
    pub zipcode: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub post_title: Option<String>,
    pub description: Option<String>,
    pub zipcode: Option<String>,
    pub unpaid: Option<bool>,
    pub pay: Option<Option<i64>>,
    pub ishourly: Option<bool>,
    pub active: Option<bool>,
    pub tags: Option<Vec<TagId>>,
}

const POST_COLUMNS: &str = "id, user_id, post_title, description, creation_date, gig_date_start, \
     gig_date_end, unpaid, pay, ishourly, active, zipcode";

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<PostRecord> {
    Ok(PostRecord {
        id: PostId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        post_title: row.get(2)?,
        description: row.get(3)?,
        creation_date: row.get(4)?,
        gig_date_start: row.get(5)?,
        gig_date_end: row.get(6)?,
        unpaid: row.get(7)?,
        pay: row.get(8)?,
        ishourly: row.get(9)?,
        active: row.get(10)?,
        zipcode: row.get(11)?,
    })
}

/// Inserts a gig and its tag associations in one transaction. The zipcode
/// foreign key guarantees the reference-table invariant.
pub fn create_post(conn: &mut Connection, post: &NewPost) -> Result<PostId, StoreError> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO posts (user_id, post_title, description, creation_date, gig_date_start,
                            gig_date_end, unpaid, pay, ishourly, active, zipcode)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)",
        params![
            post.user_id.get(),
            post.post_title,
            post.description,
            post.creation_date,
            post.gig_date_start,
            post.gig_date_end,
            post.unpaid,
            post.pay,
            post.ishourly,
            post.zipcode,
        ],
    )?;
    let id = PostId::new(tx.last_insert_rowid());
    {
        let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO posts_tags (post_id, tag_id) VALUES (?1, ?2)")?;
        for tag in &post.tags {
            stmt.execute(params![id.get(), tag.get()])?;
        }
    }
    tx.commit()?;
    Ok(id)
}

pub fn get_post(conn: &Connection, id: PostId) -> Result<Option<PostRecord>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
            params![id.get()],
            post_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn update_post(
    conn: &mut Connection,
    id: PostId,
    update: &PostUpdate,
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row("SELECT id FROM posts WHERE id = ?1", params![id.get()], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::not_found("post"));
    }

    if let Some(title) = &update.post_title {
        tx.execute(
            "UPDATE posts SET post_title = ?1 WHERE id = ?2",
            params![title, id.get()],
        )?;
    }
    if let Some(description) = &update.description {
        tx.execute(
            "UPDATE posts SET description = ?1 WHERE id = ?2",
            params![description, id.get()],
        )?;
    }
    if let Some(zipcode) = &update.zipcode {
        tx.execute(
            "UPDATE posts SET zipcode = ?1 WHERE id = ?2",
            params![zipcode, id.get()],
        )?;
    }
    if let Some(unpaid) = update.unpaid {
        tx.execute(
            "UPDATE posts SET unpaid = ?1 WHERE id = ?2",
            params![unpaid, id.get()],
        )?;
    }
    if let Some(pay) = update.pay {
        tx.execute(
            "UPDATE posts SET pay = ?1 WHERE id = ?2",
            params![pay, id.get()],
        )?;
    }
    if let Some(ishourly) = update.ishourly {
        tx.execute(
            "UPDATE posts SET ishourly = ?1 WHERE id = ?2",
            params![ishourly, id.get()],
        )?;
    }
    if let Some(active) = update.active {
        tx.execute(
            "UPDATE posts SET active = ?1 WHERE id = ?2",
            params![active, id.get()],
        )?;
    }
    if let Some(tags) = &update.tags {
        tx.execute("DELETE FROM posts_tags WHERE post_id = ?1", params![id.get()])?;
        let mut stmt =
            tx.prepare("INSERT OR IGNORE INTO posts_tags (post_id, tag_id) VALUES (?1, ?2)")?;
        for tag in tags {
            stmt.execute(params![id.get(), tag.get()])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn post_tags(conn: &Connection, id: PostId) -> Result<Vec<TagRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.tag_name FROM tags t
         JOIN posts_tags pt ON pt.tag_id = t.id
         WHERE pt.post_id = ?1
         ORDER BY t.tag_name",
    )?;
    let rows = stmt.query_map(params![id.get()], |row| {
        Ok(TagRecord {
            id: TagId::new(row.get(0)?),
            tag_name: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// The viewer's own active gigs, newest first. Ownership already scopes
/// visibility, so the unpaid rule does not apply here.
pub fn posts_for_user(conn: &Connection, user_id: UserId) -> Result<Vec<PostRecord>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {POST_COLUMNS} FROM posts
         WHERE user_id = ?1 AND active = 1
         ORDER BY creation_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id.get()], post_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Lazy housekeeping pass: flips gigs inactive once their end date (or start
/// date when no end was given) is past the grace period. Runs inside the
/// list-view request rather than on a schedule. Returns how many flipped.
pub fn deactivate_expired(conn: &Connection, now: i64) -> Result<usize, StoreError> {
    let cutoff = now - EXPIRY_GRACE_SECS;
    let changed = conn.execute(
        "UPDATE posts SET active = 0
         WHERE active = 1
           AND ((gig_date_end IS NOT NULL AND gig_date_end < ?1)
             OR (gig_date_end IS NULL AND gig_date_start IS NOT NULL AND gig_date_start < ?1))",
        params![cutoff],
    )?;
    Ok(changed)
}

/// First zipcode registered under a place name. Gig creation forms submit a
/// place, not a code.
pub fn resolve_location_zipcode(
    conn: &Connection,
    location_name: &str,
) -> Result<Option<String>, StoreError> {
    let zip = conn
        .query_row(
            "SELECT valid_zipcode FROM zipcodes WHERE location_name = ?1
             ORDER BY valid_zipcode LIMIT 1",
            params![location_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(zip)
}

pub fn zipcodes_for_location(
    conn: &Connection,
    location_name: &str,
) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT valid_zipcode FROM zipcodes WHERE location_name = ?1 ORDER BY valid_zipcode",
    )?;
    let rows = stmt.query_map(params![location_name], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn zipcodes_for_region(conn: &Connection, region: Region) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT valid_zipcode FROM zipcodes WHERE region = ?1 ORDER BY valid_zipcode")?;
    let rows = stmt.query_map(params![region.as_str()], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Place name and region of a zipcode, when it exists in the reference table.
pub fn zip_info(conn: &Connection, zipcode: &str) -> Result<Option<(String, Region)>, StoreError> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT location_name, region FROM zipcodes WHERE valid_zipcode = ?1",
            params![zipcode],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(row.map(|(name, region)| {
        let region = Region::parse(&region).unwrap_or(Region::Remote);
        (name, region)
    }))
}

/// Distinct place names for the gig form, sorted, Remote first.
pub fn locations(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT location_name FROM zipcodes
         ORDER BY (location_name != 'Remote'), location_name",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
