use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::StreamBody;
use warp::http::{self, StatusCode, header};

use crate::constants::{CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, HEADER_NOSNIFF};
use crate::error::GatewayError;

/// Plain-text error reply, newline terminated.
pub fn text_response(status: StatusCode, message: &str) -> warp::reply::Response {
    http::Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)
        .header(header::X_CONTENT_TYPE_OPTIONS, HEADER_NOSNIFF)
        .body(format!("{}\n", message).into())
        .unwrap_or_else(|_| {
            let mut fallback = warp::reply::Response::new("Internal Server Error\n".into());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

pub fn error_response(err: &GatewayError) -> warp::reply::Response {
    let status =
        StatusCode::from_u16(err.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    text_response(status, &err.message)
}

/// Relays the upstream body to the caller as it arrives.
///
/// The upstream response is moved into the body stream, so its connection is
/// released when the stream completes, fails, or is dropped by a caller
/// that went away.
pub fn relay_response(
    response: reqwest::Response,
    endpoint: &'static str,
) -> Result<warp::reply::Response, GatewayError> {
    let stream = response.bytes_stream();

    let mapped_stream = stream.map(move |item: Result<Bytes, reqwest::Error>| {
        if let Err(e) = &item {
            log::warn!("{} relay aborted: {}", endpoint, e);
        }
        item.map(warp::hyper::body::Frame::data)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    });

    let body_impl = StreamBody::new(mapped_stream);
    let boxed_body = http_body_util::BodyExt::boxed(body_impl);

    let temp_response = http::Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
        .body(boxed_body)
        .map_err(|_| GatewayError::internal_server_error("failed to build relay response"))?;

    // Relies on warp 0.4's internal `Body` being a newtype over this exact
    // `BoxBody<Bytes, Box<dyn Error + Send + Sync>>`; revisit on any warp upgrade.
    Ok(unsafe {
        std::mem::transmute::<
            http::Response<
                http_body_util::combinators::BoxBody<
                    Bytes,
                    Box<dyn std::error::Error + Send + Sync>,
                >,
            >,
            warp::reply::Response,
        >(temp_response)
    })
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn text_response_is_plain_and_newline_terminated() {
        let response = text_response(StatusCode::BAD_REQUEST, "Invalid request body");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[test]
    fn error_response_uses_error_status() {
        let response = error_response(&GatewayError::internal_server_error("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
