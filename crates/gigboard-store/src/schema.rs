use crate::StoreError;
use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA_VERSION: i64 = 1;

/// Opens (or creates) the database file with the pragmas every process uses.
pub fn open_file(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA foreign_keys=ON;
        ",
    )?;
    Ok(conn)
}

pub fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Creates the full schema. Idempotent: an already-initialized database is
/// left untouched.
pub fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    let existing: i64 =
        conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if existing >= SCHEMA_VERSION {
        return Ok(());
    }
    conn.execute_batch(
        "
        CREATE TABLE users (
          id INTEGER PRIMARY KEY,
          user_name TEXT NOT NULL UNIQUE,
          email TEXT NOT NULL UNIQUE,
          display_email TEXT NOT NULL,
          password_hash TEXT NOT NULL,
          is_artist INTEGER NOT NULL DEFAULT 0,
          verified INTEGER NOT NULL DEFAULT 0,
          veri_code TEXT NOT NULL,
          show_unpaid INTEGER NOT NULL DEFAULT 0,
          last_active INTEGER NOT NULL,
          hourly_rate INTEGER,
          link_to_website TEXT,
          bio TEXT,
          phone TEXT,
          daysweek TEXT NOT NULL DEFAULT 'fffffff'
        );
        CREATE TABLE zipcodes (
          valid_zipcode TEXT PRIMARY KEY,
          location_name TEXT NOT NULL,
          region TEXT NOT NULL
        ) WITHOUT ROWID;
        CREATE TABLE posts (
          id INTEGER PRIMARY KEY,
          user_id INTEGER NOT NULL REFERENCES users(id),
          post_title TEXT NOT NULL,
          description TEXT NOT NULL,
          creation_date INTEGER NOT NULL,
          gig_date_start INTEGER,
          gig_date_end INTEGER,
          unpaid INTEGER NOT NULL DEFAULT 0,
          pay INTEGER,
          ishourly INTEGER NOT NULL DEFAULT 0,
          active INTEGER NOT NULL DEFAULT 1,
          zipcode TEXT NOT NULL REFERENCES zipcodes(valid_zipcode)
        );
        CREATE TABLE tags (
          id INTEGER PRIMARY KEY,
          tag_name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE users_tags (
          user_id INTEGER NOT NULL REFERENCES users(id),
          tag_id INTEGER NOT NULL REFERENCES tags(id),
          PRIMARY KEY (user_id, tag_id)
        ) WITHOUT ROWID;
        CREATE TABLE posts_tags (
          post_id INTEGER NOT NULL REFERENCES posts(id),
          tag_id INTEGER NOT NULL REFERENCES tags(id),
          PRIMARY KEY (post_id, tag_id)
        ) WITHOUT ROWID;
        CREATE TABLE board_meta (
          k TEXT PRIMARY KEY,
          v TEXT NOT NULL
        ) WITHOUT ROWID;

        CREATE INDEX idx_posts_active_created ON posts(active, creation_date);
        CREATE INDEX idx_posts_user ON posts(user_id);
        CREATE INDEX idx_posts_zipcode ON posts(zipcode);
        CREATE INDEX idx_users_artist ON users(is_artist, verified, last_active);
        CREATE INDEX idx_zipcodes_region ON zipcodes(region);
        CREATE INDEX idx_zipcodes_location ON zipcodes(location_name);
        ",
    )?;
    conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
    conn.execute(
        "INSERT INTO board_meta (k, v) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}
