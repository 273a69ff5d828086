pub mod health;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::applications::handlers as applications;
use crate::state::AppState;
use crate::status::handlers as status;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Saved offers
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/metrics",
            get(applications::handle_metrics),
        )
        // Status pipeline
        .route(
            "/api/v1/applications/:id/status",
            patch(status::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/history",
            get(status::handle_get_history),
        )
        .with_state(state)
}
