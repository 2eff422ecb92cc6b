use crate::middleware::cors::cors_layer;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::fmt::Display;

mod builds;
mod comments;
mod counters;
mod heroes;
mod matches;

/// Creates the application router with all the routes, the
/// database connection, stats provider and analyzer are expected
/// to be provided as extension layers
pub fn router() -> Router {
    Router::new().nest("/api", api_router())
}

/// Creates a router for the routes that reside under /api
fn api_router() -> Router {
    Router::new()
        // Hero routing
        .merge(heroes::router())
        // Hero counter routing
        .merge(counters::router())
        // Build routing
        .merge(builds::router())
        // Build comment routing
        .merge(comments::router())
        // Match analysis routing
        .merge(matches::router())
        // CORS middleware is applied to all API routes to allow browser access
        .layer(middleware::from_fn(cors_layer))
}

/// Body used for all error responses
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Creates a JSON error response with the provided status
///
/// `status`  The response status code
/// `message` The error message
fn error_response(status: StatusCode, message: impl Display) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Body used to confirm a deletion
#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}
