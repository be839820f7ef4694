//! API route handlers
//!
//! - Health and navigation
//! - Stateful dashboard: view selection, form input, submit, reset
//! - Stateless prediction proxies

mod dashboard;
mod predict;
mod status;

pub use dashboard::*;
pub use predict::*;
pub use status::*;

use std::sync::Arc;
use std::time::Instant;

use axum::response::Response;
use tokio::sync::RwLock;
use tracing::warn;

use super::envelope::ApiErrorResponse;
use crate::client::{ClientError, Recommender};
use crate::dashboard::{Dashboard, DashboardError};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Selected view and per-view workflows
    pub dashboard: Arc<RwLock<Dashboard>>,
    /// Prediction backend
    pub recommender: Arc<dyn Recommender>,
    /// Display title from `[dashboard] title`
    pub title: String,
    /// Process start, for uptime reporting
    pub started: Instant,
}

impl DashboardState {
    pub fn new(recommender: Arc<dyn Recommender>, title: impl Into<String>) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(Dashboard::new())),
            recommender,
            title: title.into(),
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Map a client failure to its HTTP status and error code.
///
/// Sub-request wrapping is looked through for classification; the message
/// keeps the attribution.
pub fn client_error_response(err: &ClientError) -> Response {
    let message = err.to_string();
    match err.root() {
        ClientError::Validation(_) => ApiErrorResponse::validation(message),
        ClientError::Domain(_) => ApiErrorResponse::unknown_county(message),
        ClientError::Http { .. } | ClientError::Decode { .. } => {
            ApiErrorResponse::bad_gateway(message)
        }
        ClientError::Network { .. } => ApiErrorResponse::upstream_unavailable(message),
        ClientError::Setup(_) | ClientError::SubRequest { .. } => {
            warn!(error = %err, "Unexpected client error");
            ApiErrorResponse::internal(message)
        }
    }
}

pub fn dashboard_error_response(err: &DashboardError) -> Response {
    ApiErrorResponse::bad_request(err.to_string())
}

/// Fallback for unmatched paths.
pub async fn not_found() -> Response {
    ApiErrorResponse::not_found("No such endpoint")
}
