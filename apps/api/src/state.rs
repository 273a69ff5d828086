use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job offer persistence. Default: PgApplicationStore over the shared pool.
    pub store: Arc<dyn ApplicationStore>,
    #[allow(dead_code)]
    pub config: Config,
}
