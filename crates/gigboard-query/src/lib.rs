#![forbid(unsafe_code)]

//! Multi-criteria gig and artist search.
//!
//! Each optional criterion, when absent, contributes the full candidate set
//! (the identity element for intersection). Supplied criteria are conjoined
//! into a single parameterized SQL statement, so the intersection happens by
//! row identity inside the database and every matching record appears exactly
//! once, in a total order.

use gigboard_model::{Region, TagId, UserId, Weekday};
use rusqlite::{params_from_iter, types::Value, Connection};
use serde::{Deserialize, Serialize};

mod query_error;

pub use query_error::{QueryError, QueryErrorCode};

pub const CRATE_NAME: &str = "gigboard-query";

/// Request-scoped identity of whoever is searching. Replaces any notion of a
/// global current user: handlers construct one per request and pass it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: Option<UserId>,
    pub show_unpaid: bool,
}

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            show_unpaid: false,
        }
    }

    #[must_use]
    pub const fn logged_in(user_id: UserId, show_unpaid: bool) -> Self {
        Self {
            user_id: Some(user_id),
            show_unpaid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GigFilter {
    pub text: Option<String>,
    pub tags: Vec<TagId>,
    pub region: Option<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtistFilter {
    pub text: Option<String>,
    pub tags: Vec<TagId>,
    pub day: Option<Weekday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_text_len: usize,
    pub max_tags: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_text_len: 200,
            max_tags: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GigRow {
    pub id: i64,
    pub user_id: i64,
    pub post_title: String,
    pub description: String,
    pub creation_date: i64,
    pub unpaid: bool,
    pub pay: Option<i64>,
    pub ishourly: bool,
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRow {
    pub id: i64,
    pub user_name: String,
    pub bio: Option<String>,
    pub last_active: i64,
    pub hourly_rate: Option<i64>,
    pub daysweek: String,
}

/// Active gigs visible to `viewer`, newest first, satisfying every supplied
/// criterion. Unpaid gigs are withheld unless the viewer opted in.
pub fn search_gigs(
    conn: &Connection,
    viewer: &Viewer,
    filter: &GigFilter,
    limits: &SearchLimits,
) -> Result<Vec<GigRow>, QueryError> {
    validate_filter(filter.text.as_deref(), filter.tags.len(), limits)?;

    let mut sql = String::from(
        "SELECT p.id, p.user_id, p.post_title, p.description, p.creation_date, \
         p.unpaid, p.pay, p.ishourly, p.zipcode FROM posts p",
    );
    let mut where_parts: Vec<String> = vec!["p.active = 1".to_string()];
    let mut params: Vec<Value> = Vec::new();

    if !viewer.show_unpaid {
        where_parts.push("p.unpaid = 0".to_string());
    }
    if let Some(text) = non_empty(filter.text.as_deref()) {
        let pattern = like_pattern(text);
        where_parts.push(
            "(LOWER(p.post_title) LIKE ? ESCAPE '!' OR LOWER(p.description) LIKE ? ESCAPE '!')"
                .to_string(),
        );
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }
    if !filter.tags.is_empty() {
        where_parts.push(format!(
            "EXISTS (SELECT 1 FROM posts_tags pt WHERE pt.post_id = p.id AND pt.tag_id IN ({}))",
            placeholders(filter.tags.len())
        ));
        params.extend(filter.tags.iter().map(|t| Value::Integer(t.get())));
    }
    if let Some(region) = filter.region {
        where_parts.push(
            "EXISTS (SELECT 1 FROM zipcodes z \
             WHERE z.valid_zipcode = p.zipcode AND z.region = ?)"
                .to_string(),
        );
        params.push(Value::Text(region.as_str().to_string()));
    }

    sql.push_str(" WHERE ");
    sql.push_str(&where_parts.join(" AND "));
    sql.push_str(" ORDER BY p.creation_date DESC, p.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt.query_map(params_from_iter(params.iter()), |row| {
        Ok(GigRow {
            id: row.get(0)?,
            user_id: row.get(1)?,
            post_title: row.get(2)?,
            description: row.get(3)?,
            creation_date: row.get(4)?,
            unpaid: row.get(5)?,
            pay: row.get(6)?,
            ishourly: row.get(7)?,
            zipcode: row.get(8)?,
        })
    })?;
    Ok(mapped.collect::<Result<Vec<_>, _>>()?)
}

/// Verified artists satisfying every supplied criterion, most recently
/// active first.
pub fn search_artists(
    conn: &Connection,
    filter: &ArtistFilter,
    limits: &SearchLimits,
) -> Result<Vec<ArtistRow>, QueryError> {
    validate_filter(filter.text.as_deref(), filter.tags.len(), limits)?;

    let mut sql = String::from(
        "SELECT u.id, u.user_name, u.bio, u.last_active, u.hourly_rate, u.daysweek FROM users u",
    );
    let mut where_parts: Vec<String> = vec!["u.is_artist = 1".to_string(), "u.verified = 1".to_string()];
    let mut params: Vec<Value> = Vec::new();

    if let Some(text) = non_empty(filter.text.as_deref()) {
        let pattern = like_pattern(text);
        where_parts.push(
            "(LOWER(u.user_name) LIKE ? ESCAPE '!' \
             OR LOWER(COALESCE(u.bio, '')) LIKE ? ESCAPE '!')"
                .to_string(),
        );
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }
    if !filter.tags.is_empty() {
        where_parts.push(format!(
            "EXISTS (SELECT 1 FROM users_tags ut WHERE ut.user_id = u.id AND ut.tag_id IN ({}))",
            placeholders(filter.tags.len())
        ));
        params.extend(filter.tags.iter().map(|t| Value::Integer(t.get())));
    }
    if let Some(day) = filter.day {
        // substr is 1-based; an out-of-range index yields '' and matches
        // nothing instead of erroring.
        where_parts.push("substr(u.daysweek, ?, 1) = 't'".to_string());
        params.push(Value::Integer(day.index() as i64 + 1));
    }

    sql.push_str(" WHERE ");
    sql.push_str(&where_parts.join(" AND "));
    sql.push_str(" ORDER BY u.last_active DESC, u.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt.query_map(params_from_iter(params.iter()), |row| {
        Ok(ArtistRow {
            id: row.get(0)?,
            user_name: row.get(1)?,
            bio: row.get(2)?,
            last_active: row.get(3)?,
            hourly_rate: row.get(4)?,
            daysweek: row.get(5)?,
        })
    })?;
    Ok(mapped.collect::<Result<Vec<_>, _>>()?)
}

fn validate_filter(
    text: Option<&str>,
    tag_count: usize,
    limits: &SearchLimits,
) -> Result<(), QueryError> {
    if let Some(text) = text {
        if text.len() > limits.max_text_len {
            return Err(QueryError::new(
                QueryErrorCode::Validation,
                format!("search text exceeds {} bytes", limits.max_text_len),
            ));
        }
    }
    if tag_count > limits.max_tags {
        return Err(QueryError::new(
            QueryErrorCode::Validation,
            format!("tag criterion exceeds {} tags", limits.max_tags),
        ));
    }
    Ok(())
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn placeholders(count: usize) -> String {
    let mut out = String::with_capacity(count * 2);
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push('?');
    }
    out
}

/// Case-insensitive substring pattern: lowercased and LIKE-escaped, wrapped
/// in wildcards.
#[must_use]
pub fn like_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('%');
    for c in text.to_lowercase().chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('%');
    out
}
