// SPDX-License-Identifier: Apache-2.0
#![forbid(unsafe_code)]

//! HTTP service for the gigboard marketplace: accounts, profiles, gig and
//! artist search, tag administration, and the gig map view. Thin JSON glue
//! over the model/query/store/geo crates.

pub mod auth;
pub mod config;
pub mod http;
mod state;

pub use config::{ServerConfig, SuburbSourceConfig};
pub use http::build_router;
pub use state::AppState;

/// Wall clock in unix seconds. All persisted timestamps use this.
#[must_use]
pub fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(_) => 0,
    }
}
