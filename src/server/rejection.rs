use std::convert::Infallible;

use warp::Rejection;

use crate::constants::{ERROR_METHOD_NOT_ALLOWED, ERROR_NOT_FOUND};
use crate::error::GatewayError;
use crate::http::error_response;

/// Renders every rejection as a plain-text reply.
pub async fn handle_rejection(
    rejection: Rejection,
) -> Result<warp::reply::Response, Infallible> {
    let error = if let Some(gateway_err) = rejection.find::<GatewayError>() {
        gateway_err.clone()
    } else if rejection.is_not_found() {
        GatewayError::new(ERROR_NOT_FOUND.to_string(), 404)
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        GatewayError::new(ERROR_METHOD_NOT_ALLOWED.to_string(), 405)
    } else {
        log::error!("unhandled rejection: {:?}", rejection);
        GatewayError::internal_server_error("internal server error")
    };

    if error.is_upstream_unavailable() {
        log::error!("{}", error.message);
    } else if error.is_client_error() {
        log::debug!("{}", error);
    }

    Ok(error_response(&error))
}
