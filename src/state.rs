// src/state.rs

use crate::config::Config;
use sqlx::PgPool;

/// Shared state handed to every handler. Handlers extract the pieces they
/// need (`Store`) through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}
