// SPDX-License-Identifier: Apache-2.0

use crate::ServerConfig;
use gigboard_geo::SuburbAtlas;
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared per-process state. The single sqlite connection is serialized
/// behind an async mutex; handlers hold it only for the duration of their
/// queries.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub atlas: Arc<SuburbAtlas>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(conn: Connection, atlas: SuburbAtlas, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            atlas: Arc::new(atlas),
            config: Arc::new(config),
        }
    }
}
