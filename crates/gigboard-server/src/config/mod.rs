// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

/// One suburb boundary file and the feature property its zipcodes live
/// under.
#[derive(Debug, Clone)]
pub struct SuburbSourceConfig {
    pub path: PathBuf,
    pub zip_key: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Database file; `None` runs on an in-memory database.
    pub db_path: Option<PathBuf>,
    pub session_secret: Vec<u8>,
    pub session_max_age_secs: i64,
    pub suburb_sources: Vec<SuburbSourceConfig>,
    pub max_body_bytes: usize,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            db_path: None,
            session_secret: Vec::new(),
            session_max_age_secs: 14 * 86_400,
            suburb_sources: Vec::new(),
            max_body_bytes: 64 * 1024,
            log_json: true,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from `GIGBOARD_*` environment variables, with
    /// defaults for everything but the session secret. An absent secret
    /// stays empty here; startup replaces it with a random one and warns,
    /// since sessions then die with the process.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("GIGBOARD_BIND").unwrap_or(defaults.bind_addr),
            db_path: env::var("GIGBOARD_DB").ok().map(PathBuf::from),
            session_secret: env::var("GIGBOARD_SESSION_SECRET")
                .map(String::into_bytes)
                .unwrap_or_default(),
            session_max_age_secs: env_i64(
                "GIGBOARD_SESSION_MAX_AGE_SECS",
                defaults.session_max_age_secs,
            ),
            suburb_sources: env_suburb_sources("GIGBOARD_SUBURBS"),
            max_body_bytes: env_usize("GIGBOARD_MAX_BODY_BYTES", defaults.max_body_bytes),
            log_json: env_bool("GIGBOARD_LOG_JSON", defaults.log_json),
        }
    }
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub(crate) fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

/// Comma-separated `zip_key=path` entries, e.g.
/// `zip=/data/suburbs.json,ZCTA=/data/zcta.json`.
fn env_suburb_sources(name: &str) -> Vec<SuburbSourceConfig> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .filter_map(|item| {
            let (key, path) = item.split_once('=')?;
            let key = key.trim();
            let path = path.trim();
            if key.is_empty() || path.is_empty() {
                return None;
            }
            Some(SuburbSourceConfig {
                path: PathBuf::from(path),
                zip_key: key.to_string(),
            })
        })
        .collect()
}
