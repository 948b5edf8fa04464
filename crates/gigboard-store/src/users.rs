use crate::tags::TagRecord;
use crate::{StoreError, StoreErrorCode};
use gigboard_model::{DaysWeek, TagId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub display_email: String,
    pub password_hash: String,
    pub veri_code: String,
    pub last_active: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub display_email: String,
    pub password_hash: String,
    pub is_artist: bool,
    pub verified: bool,
    pub veri_code: String,
    pub show_unpaid: bool,
    pub last_active: i64,
    pub hourly_rate: Option<i64>,
    pub link_to_website: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub daysweek: String,
}

/// Fields a profile update may change; `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub is_artist: Option<bool>,
    pub show_unpaid: Option<bool>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub link_to_website: Option<String>,
    pub hourly_rate: Option<i64>,
    pub tags: Option<Vec<TagId>>,
}

const USER_COLUMNS: &str = "id, user_name, email, display_email, password_hash, is_artist, \
     verified, veri_code, show_unpaid, last_active, hourly_rate, link_to_website, bio, phone, \
     daysweek";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: UserId::new(row.get(0)?),
        user_name: row.get(1)?,
        email: row.get(2)?,
        display_email: row.get(3)?,
        password_hash: row.get(4)?,
        is_artist: row.get(5)?,
        verified: row.get(6)?,
        veri_code: row.get(7)?,
        show_unpaid: row.get(8)?,
        last_active: row.get(9)?,
        hourly_rate: row.get(10)?,
        link_to_website: row.get(11)?,
        bio: row.get(12)?,
        phone: row.get(13)?,
        daysweek: row.get(14)?,
    })
}

/// Inserts a new account. Email is stored lowercased so login lookups are
/// case-insensitive; duplicate user_name or email surfaces as Conflict.
pub fn create_user(conn: &Connection, user: &NewUser) -> Result<UserId, StoreError> {
    conn.execute(
        "INSERT INTO users (user_name, email, display_email, password_hash, veri_code, last_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.user_name,
            user.email.to_lowercase(),
            user.display_email,
            user.password_hash,
            user.veri_code,
            user.last_active,
        ],
    )?;
    Ok(UserId::new(conn.last_insert_rowid()))
}

pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<UserRecord>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.get()],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn find_user_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email.to_lowercase()],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn find_user_by_name(
    conn: &Connection,
    user_name: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_name = ?1"),
            params![user_name],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

pub fn touch_last_active(conn: &Connection, id: UserId, now: i64) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE users SET last_active = ?1 WHERE id = ?2",
        params![now, id.get()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("user"));
    }
    Ok(())
}

/// Marks the user verified when the submitted code matches. Returns whether
/// the code matched.
pub fn verify_user(conn: &Connection, id: UserId, code: &str) -> Result<bool, StoreError> {
    let changed = conn.execute(
        "UPDATE users SET verified = 1 WHERE id = ?1 AND veri_code = ?2",
        params![id.get(), code],
    )?;
    Ok(changed > 0)
}

pub fn set_password_hash(conn: &Connection, id: UserId, hash: &str) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE id = ?2",
        params![hash, id.get()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("user"));
    }
    Ok(())
}

pub fn set_availability(
    conn: &Connection,
    id: UserId,
    days: &DaysWeek,
) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE users SET daysweek = ?1 WHERE id = ?2",
        params![days.as_str(), id.get()],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("user"));
    }
    Ok(())
}

pub fn update_profile(
    conn: &mut Connection,
    id: UserId,
    update: &ProfileUpdate,
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row("SELECT id FROM users WHERE id = ?1", params![id.get()], |r| {
            r.get(0)
        })
        .optional()?;
    if exists.is_none() {
        return Err(StoreError::not_found("user"));
    }

    if let Some(is_artist) = update.is_artist {
        tx.execute(
            "UPDATE users SET is_artist = ?1 WHERE id = ?2",
            params![is_artist, id.get()],
        )?;
    }
    if let Some(show_unpaid) = update.show_unpaid {
        tx.execute(
            "UPDATE users SET show_unpaid = ?1 WHERE id = ?2",
            params![show_unpaid, id.get()],
        )?;
    }
    if let Some(bio) = &update.bio {
        tx.execute(
            "UPDATE users SET bio = ?1 WHERE id = ?2",
            params![bio, id.get()],
        )?;
    }
    if let Some(phone) = &update.phone {
        tx.execute(
            "UPDATE users SET phone = ?1 WHERE id = ?2",
            params![phone, id.get()],
        )?;
    }
    if let Some(link) = &update.link_to_website {
        tx.execute(
            "UPDATE users SET link_to_website = ?1 WHERE id = ?2",
            params![link, id.get()],
        )?;
    }
    if let Some(rate) = update.hourly_rate {
        tx.execute(
            "UPDATE users SET hourly_rate = ?1 WHERE id = ?2",
            params![rate, id.get()],
        )?;
    }
    if let Some(tags) = &update.tags {
        replace_user_tags(&tx, id, tags)?;
    }
    tx.commit()?;
    Ok(())
}

pub fn set_user_tags(
    conn: &mut Connection,
    id: UserId,
    tags: &[TagId],
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    replace_user_tags(&tx, id, tags)?;
    tx.commit()?;
    Ok(())
}

fn replace_user_tags(
    tx: &rusqlite::Transaction<'_>,
    id: UserId,
    tags: &[TagId],
) -> Result<(), StoreError> {
    tx.execute("DELETE FROM users_tags WHERE user_id = ?1", params![id.get()])?;
    let mut stmt = tx.prepare("INSERT OR IGNORE INTO users_tags (user_id, tag_id) VALUES (?1, ?2)")?;
    for tag in tags {
        let inserted = stmt.execute(params![id.get(), tag.get()]);
        if let Err(e) = inserted {
            return Err(StoreError::new(
                StoreErrorCode::Conflict,
                format!("unknown tag {tag}: {e}"),
            ));
        }
    }
    Ok(())
}

pub fn user_tags(conn: &Connection, id: UserId) -> Result<Vec<TagRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.tag_name FROM tags t
         JOIN users_tags ut ON ut.tag_id = t.id
         WHERE ut.user_id = ?1
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
