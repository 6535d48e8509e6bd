//! HTTP API module for the expense policy engine.
//!
//! `POST /validate` evaluates one expense and `GET /health` reports
//! liveness.

mod handlers;
mod request;
mod response;
mod state;

use tracing::info;

use crate::config::ServerSettings;
use crate::error::{EngineError, EngineResult};

pub use handlers::create_router;
pub use request::{ExpenseRequest, ValidationRequest};
pub use response::{ApiError, ApiErrorCode};
pub use state::AppState;

/// Binds to the configured address and serves the API until the process exits.
///
/// # Errors
///
/// Returns [`EngineError::ServerError`] if the address cannot be bound or
/// the server stops with an error.
pub async fn serve(state: AppState, settings: &ServerSettings) -> EngineResult<()> {
    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| EngineError::ServerError {
            message: format!("failed to bind {}: {}", addr, e),
        })?;

    info!(%addr, "expense policy API listening");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| EngineError::ServerError {
            message: e.to_string(),
        })
}
