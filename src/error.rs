use std::error::Error;
use std::fmt;
use std::time::Duration;

use warp::reject::Reject;

use crate::constants::{ERROR_INVALID_BODY, ERROR_MARSHAL_PREFIX, ERROR_UPSTREAM_PREFIX};
use crate::logging::format_duration;

/// Error raised while serving a single request
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub message: String,
    pub status_code: u16,
    kind: GatewayErrorKind,
}

#[derive(Debug, Clone)]
enum GatewayErrorKind {
    BadRequest,
    InternalServerError,
    UpstreamUnavailable,
    Custom,
}

impl GatewayError {
    pub fn new(message: String, status_code: u16) -> Self {
        Self {
            message,
            status_code,
            kind: GatewayErrorKind::Custom,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 400,
            kind: GatewayErrorKind::BadRequest,
        }
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 500,
            kind: GatewayErrorKind::InternalServerError,
        }
    }

    pub fn invalid_body() -> Self {
        Self::bad_request(ERROR_INVALID_BODY)
    }

    pub fn marshal(err: serde_json::Error) -> Self {
        Self::internal_server_error(&format!("{}: {}", ERROR_MARSHAL_PREFIX, err))
    }

    /// Upstream could not be reached or the transfer failed before a response arrived.
    pub fn upstream(err: &reqwest::Error) -> Self {
        Self {
            message: format!("{}: {}", ERROR_UPSTREAM_PREFIX, err),
            status_code: 500,
            kind: GatewayErrorKind::UpstreamUnavailable,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::BadRequest)
    }

    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self.kind, GatewayErrorKind::UpstreamUnavailable)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GatewayError {}: {}", self.status_code, self.message)
    }
}

impl Error for GatewayError {}

impl Reject for GatewayError {}

/// Lifecycle failures surfaced to `main`
#[derive(Debug)]
pub enum ServerError {
    Config(String),
    Client(reqwest::Error),
    Signal(std::io::Error),
    Listener(String),
    ShutdownTimeout(Duration),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(message) => write!(f, "invalid configuration: {}", message),
            ServerError::Client(e) => write!(f, "failed to build upstream client: {}", e),
            ServerError::Signal(e) => write!(f, "failed to listen for shutdown signal: {}", e),
            ServerError::Listener(message) => write!(f, "listener task failed: {}", message),
            ServerError::ShutdownTimeout(timeout) => write!(
                f,
                "graceful shutdown did not finish within {}",
                format_duration(*timeout)
            ),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerError::Client(e) => Some(e),
            ServerError::Signal(e) => Some(e),
            _ => None,
        }
    }
}
