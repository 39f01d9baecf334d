use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::constants::CONTENT_TYPE_JSON;
use crate::error::GatewayError;

/// `upstream_idle_timeout` bounds each wait on the daemon (headers or the next
/// body chunk), not the whole relay, so long generate streams are not cut off.
pub fn build_client(
    upstream_idle_timeout: Option<Duration>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60));

    if let Some(timeout) = upstream_idle_timeout {
        builder = builder.read_timeout(timeout);
    }

    builder.build()
}

/// One upstream call. Never retried; the caller sees the first failure.
pub struct UpstreamRequest<'a> {
    client: &'a reqwest::Client,
}

impl<'a> UpstreamRequest<'a> {
    pub fn new(client: &'a reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, GatewayError> {
        let request_builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body);

        request_builder.send().await.map_err(map_reqwest_error)
    }

    pub async fn get(&self, url: &str) -> Result<reqwest::Response, GatewayError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

pub fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    let reason = if err.is_connect() {
        "connection failed"
    } else if err.is_timeout() {
        "timed out"
    } else if err.is_request() {
        "invalid request"
    } else {
        "request failed"
    };
    log::debug!("upstream {}: {:?}", reason, err);
    GatewayError::upstream(&err)
}
