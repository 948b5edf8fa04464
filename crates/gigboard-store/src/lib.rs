#![forbid(unsafe_code)]

//! Relational storage for the gigboard marketplace.
//!
//! Owns the schema, reference-data seeding (zipcodes with their region
//! classification, the tag vocabulary), and all row mutations. Reads that
//! answer search requests live in `gigboard-query`.

mod posts;
mod schema;
mod seed;
mod tags;
mod users;

pub use posts::{
    deactivate_expired, create_post, get_post, locations, post_tags, posts_for_user,
    resolve_location_zipcode, update_post, zip_info, zipcodes_for_location,
    zipcodes_for_region, NewPost, PostRecord, PostUpdate, EXPIRY_GRACE_SECS,
};
pub use schema::{create_schema, open_file, open_memory, SCHEMA_VERSION};
pub use seed::{seed_reference_data, SEED_TAGS, SEED_ZIPCODES};
pub use tags::{add_tag, list_tags, remove_tag, TagRecord};
pub use users::{
    create_user, find_user_by_email, find_user_by_name, get_user, set_availability,
    set_password_hash, set_user_tags, touch_last_active, update_profile, user_tags,
    verify_user, NewUser, ProfileUpdate, UserRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Conflict,
    Sql,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(what: &str) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("{what} not found"))
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        let code = match &value {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreErrorCode::Conflict
            }
            _ => StoreErrorCode::Sql,
        };
        Self::new(code, value.to_string())
    }
}
