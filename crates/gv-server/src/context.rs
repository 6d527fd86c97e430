//! Application context shared by every request handler.

use std::sync::Arc;

use gv_core::config::Config;
use gv_db::pool::DbPool;

use crate::templates::Templates;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds a pool handle and `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Compiled page templates.
    pub templates: Arc<Templates>,
}

impl AppContext {
    /// Compile the templates for `config` and bundle them with `db`.
    pub fn new(config: Config, db: DbPool) -> gv_core::Result<Self> {
        let templates = Templates::load(config.server.template_dir.as_deref())?;
        Ok(Self {
            db,
            config: Arc::new(config),
            templates: Arc::new(templates),
        })
    }
}
