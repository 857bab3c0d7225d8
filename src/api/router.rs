use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, submit_request_form, submit_request_query};
use crate::config::SubmitMethod;

/// Creates the API router with the direct-borrowing endpoints
///
/// Submission endpoint:
/// - GET|POST /borrow-direct/:service_id/:request_id - Place a request
///
/// The HTTP method is configurable; GET is the default because some SSO
/// front-doors mishandle POST bodies on the way through.
pub fn create_router(state: Arc<AppState>) -> Router {
    let submit_route = match state.submission_deps.config.submit_method {
        SubmitMethod::Get => get(submit_request_query),
        SubmitMethod::Post => post(submit_request_form),
    };

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Submission endpoint
        .route("/borrow-direct/:service_id/:request_id", submit_route)
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
