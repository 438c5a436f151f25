//! Router assembly for the catalogue HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive and
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Problems
        .route(
            "/problems",
            get(handlers::problems::index).post(handlers::problems::create),
        )
        .route(
            "/problems/exists/{generated_problem_id}",
            get(handlers::problems::exists),
        )
        .route(
            "/problems/{problem_id}",
            get(handlers::problems::show)
                .put(handlers::problems::update)
                .delete(handlers::problems::delete),
        )
        // Problem sets
        .route(
            "/problem-sets",
            get(handlers::problem_sets::index).post(handlers::problem_sets::create),
        )
        .route(
            "/problem-sets/{set_id}",
            get(handlers::problem_sets::show)
                .put(handlers::problem_sets::update)
                .delete(handlers::problem_sets::delete),
        )
        .route(
            "/problem-sets/{set_id}/problems",
            get(handlers::problem_sets::problems),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
