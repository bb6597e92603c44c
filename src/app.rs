use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/filaments",
            get(handlers::list_filaments).post(handlers::create_filament),
        )
        .route("/api/filaments/import", post(handlers::import_filaments))
        .route(
            "/api/filaments/:id",
            put(handlers::update_filament).delete(handlers::delete_filament),
        )
        .route("/api/filaments/:id/use", post(handlers::use_filament))
        .with_state(state)
}
