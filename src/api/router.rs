use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_loan, delete_loan, get_loan_by_id, list_loans, return_loan, update_loan,
};

/// Creates the API router with all loan management endpoints
///
/// - GET /loans - List all loans
/// - POST /loans - Request a new loan
/// - GET /loans/:id - Get loan details
/// - PUT /loans/:id - Partially update a loan
/// - DELETE /loans/:id - Delete a loan
/// - POST /loans/:id/return - Return a book
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/loans", get(list_loans).post(create_loan))
        .route(
            "/loans/:id",
            get(get_loan_by_id).put(update_loan).delete(delete_loan),
        )
        .route("/loans/:id/return", post(return_loan))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
