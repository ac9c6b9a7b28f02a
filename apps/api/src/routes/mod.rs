pub mod health;

use axum::{routing::get, Router};

use crate::resumes::handlers;
use crate::state::AppState;
use crate::templates::handlers::handle_list_templates;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resumes",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route(
            "/resumes/:id",
            get(handlers::handle_get)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .route("/templates", get(handle_list_templates))
}

pub fn build_router(state: AppState) -> Router {
    let api = api_routes();
    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
}
