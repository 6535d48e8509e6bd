//! HTTP request handlers for the expense policy API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::request::ValidationRequest;
use super::response::{ApiError, ApiErrorCode};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/validate", post(validate_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> &'static str {
    "ok"
}

/// Handler for POST /validate endpoint.
///
/// Accepts an expense and employee and returns the policy decision.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidationRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::new(ApiErrorCode::ValidationError, body_text)
                    } else {
                        ApiError::new(ApiErrorCode::MalformedJson, body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::new(
                        ApiErrorCode::MalformedJson,
                        format!("Invalid JSON syntax: {}", err),
                    )
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    ApiErrorCode::MissingContentType,
                    "Content-Type must be application/json",
                ),
                _ => ApiError::new(ApiErrorCode::MalformedJson, "Failed to parse request body"),
            };
            return error.into_response();
        }
    };

    let expense_id = request.expense.id.clone();
    let employee_id = request.employee.id.clone();
    let start_time = Instant::now();
    match request
        .evaluate(state.policy(), Some(state.rates()))
        .await
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                expense_id = %result.expense_id,
                employee_id = %employee_id,
                status = %result.status,
                alerts = result.alerts.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Validation completed"
            );
            Json(result).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                expense_id = %expense_id,
                error = %err,
                "Validation failed"
            );
            ApiError::from(err).into_response()
        }
    }
}
