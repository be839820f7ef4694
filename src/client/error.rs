//! Recommendation client errors

use crate::config::defaults::{GENERIC_INVALID_REQUEST_MESSAGE, UNKNOWN_COUNTY_MARKER, UNKNOWN_COUNTY_MESSAGE};
use crate::types::ValidationError;

use super::Endpoint;

/// Everything that can go wrong between form input and a typed result.
///
/// `Display` yields the single message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Pre-flight check failed; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Service answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Service rejected the request for a reason we recognise.
    #[error("{0}")]
    Domain(String),

    /// Transport failure (DNS, connect, TLS, reset, timeout).
    #[error("Could not reach the {endpoint} service: {source}")]
    Network {
        endpoint: Endpoint,
        source: reqwest::Error,
    },

    /// 2xx response whose body did not match the expected shape.
    #[error("Invalid response from the {endpoint} service: {reason}")]
    Decode { endpoint: Endpoint, reason: String },

    /// One half of the combined fertilizer call failed.
    #[error("{} request failed: {source}", .endpoint.title())]
    SubRequest {
        endpoint: Endpoint,
        source: Box<ClientError>,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Setup(reqwest::Error),
}

impl ClientError {
    /// Non-2xx failure with the generic status message.
    pub fn http(status: u16) -> Self {
        Self::Http {
            status,
            message: format!("HTTP error! status: {status}"),
        }
    }

    /// Non-2xx failure carrying a server-provided message.
    pub fn http_with_detail(status: u16, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: detail.into(),
        }
    }

    /// Attribute this error to one half of a combined call.
    pub fn in_sub_request(self, endpoint: Endpoint) -> Self {
        Self::SubRequest {
            endpoint,
            source: Box::new(self),
        }
    }

    /// HTTP status of the failing response, looking through sub-request wrapping.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::SubRequest { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Endpoint that failed in a combined call.
    pub fn failed_endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::SubRequest { endpoint, .. } => Some(*endpoint),
            Self::Network { endpoint, .. } | Self::Decode { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// The innermost error, unwrapping sub-request attribution.
    pub fn root(&self) -> &Self {
        match self {
            Self::SubRequest { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), Self::Validation(_))
    }
}

/// Map a regional-service 400 body to an error.
///
/// Unknown counties get a domain message; otherwise the server `detail`
/// string is surfaced as-is, falling back to a generic message.
pub fn classify_regional_rejection(body: &str) -> ClientError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

    let mentions_unknown_county = match &detail {
        Some(d) => d.contains(UNKNOWN_COUNTY_MARKER),
        None => body.contains(UNKNOWN_COUNTY_MARKER),
    };
    if mentions_unknown_county {
        return ClientError::Domain(UNKNOWN_COUNTY_MESSAGE.to_string());
    }

    match detail {
        Some(d) if !d.trim().is_empty() => ClientError::http_with_detail(400, d),
        _ => ClientError::http_with_detail(400, GENERIC_INVALID_REQUEST_MESSAGE),
    }
}
