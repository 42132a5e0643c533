pub mod health;

use axum::{routing::get, Router};

use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume)
                .put(handlers::handle_update_resume)
                .delete(handlers::handle_delete_resume),
        )
        .with_state(state)
}
