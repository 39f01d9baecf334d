use std::time::Instant;

use bytes::Bytes;
use log::Level;

use crate::constants::OLLAMA_GENERATE;
use crate::error::GatewayError;
use crate::handlers::RequestContext;
use crate::http::request::{GenerateRequest, encode_payload};
use crate::http::{UpstreamRequest, relay_response};
use crate::logging::{log_request, log_timed, log_upstream_payload};

/// `POST /generate`: forwards `model` and `prompt` to the daemon and relays its body.
pub async fn handle_generate(
    context: RequestContext<'_>,
    body: Bytes,
) -> Result<warp::reply::Response, GatewayError> {
    let start_time = Instant::now();

    let request = GenerateRequest::decode(&body)?;
    log_request("POST /generate", Some(&request.model));

    let payload = request.to_upstream_payload();
    let encoded = encode_payload(&payload)?;
    log_upstream_payload("generate", &payload);

    let url = context.endpoint_url(OLLAMA_GENERATE);
    let response = UpstreamRequest::new(context.client)
        .post_json(&url, encoded)
        .await?;

    log_timed(
        Level::Info,
        &format!("Ollama generate responded {}", response.status()),
        start_time,
    );
    relay_response(response, "generate")
}
