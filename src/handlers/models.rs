use std::time::Instant;

use log::Level;

use crate::constants::OLLAMA_TAGS;
use crate::error::GatewayError;
use crate::handlers::RequestContext;
use crate::http::{UpstreamRequest, relay_response};
use crate::logging::{log_request, log_timed};

/// `GET /models`: relays the daemon's tag listing untouched.
pub async fn handle_list_models(
    context: RequestContext<'_>,
) -> Result<warp::reply::Response, GatewayError> {
    let start_time = Instant::now();
    log_request("GET /models", None);

    let url = context.endpoint_url(OLLAMA_TAGS);
    let response = UpstreamRequest::new(context.client).get(&url).await?;

    log_timed(
        Level::Info,
        &format!("Ollama tags responded {}", response.status()),
        start_time,
    );
    relay_response(response, "models")
}
