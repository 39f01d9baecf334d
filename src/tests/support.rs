use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use clap::Parser;
use tokio::net::TcpListener;
use warp::Filter;
use warp::http::StatusCode;

use crate::config::Config;
use crate::server::{GatewayServer, ServingHandle};

pub const GENERATE_REPLY: &str = r#"{"response":"hi there"}"#;
pub const MISSING_MODEL_REPLY: &str = r#"{"error":"model 'missing' not found"}"#;
pub const TAGS_REPLY: &str = r#"{"models":[{"name":"llama2:latest","size":3825819519}]}"#;

/// What the stub daemon saw.
#[derive(Clone, Default)]
pub struct StubRecorder {
    generate_calls: Arc<Mutex<Vec<(Option<String>, Bytes)>>>,
    tags_calls: Arc<AtomicUsize>,
}

impl StubRecorder {
    pub fn generate_bodies(&self) -> Vec<serde_json::Value> {
        self.generate_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| serde_json::from_slice(body).expect("upstream body is json"))
            .collect()
    }

    pub fn generate_content_types(&self) -> Vec<Option<String>> {
        self.generate_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(content_type, _)| content_type.clone())
            .collect()
    }

    pub fn generate_count(&self) -> usize {
        self.generate_calls.lock().unwrap().len()
    }

    pub fn tags_count(&self) -> usize {
        self.tags_calls.load(Ordering::SeqCst)
    }
}

/// Minimal stand-in for the Ollama daemon on an ephemeral port.
pub struct StubOllama {
    pub url: String,
    pub recorder: StubRecorder,
}

impl StubOllama {
    pub async fn start() -> Self {
        Self::start_with_delay(Duration::ZERO).await
    }

    /// `delay` is applied to `/api/generate` before replying.
    pub async fn start_with_delay(delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub ollama");
        let addr = listener.local_addr().expect("stub address");
        let recorder = StubRecorder::default();

        let generate_recorder = recorder.clone();
        let generate = warp::path!("api" / "generate")
            .and(warp::post())
            .and(warp::header::optional::<String>("content-type"))
            .and(warp::body::bytes())
            .then(move |content_type: Option<String>, body: Bytes| {
                let recorder = generate_recorder.clone();
                async move {
                    let missing = body
                        .windows(b"\"missing\"".len())
                        .any(|w| w == b"\"missing\"");
                    recorder
                        .generate_calls
                        .lock()
                        .unwrap()
                        .push((content_type, body));
                    tokio::time::sleep(delay).await;

                    let (status, reply) = if missing {
                        (StatusCode::NOT_FOUND, MISSING_MODEL_REPLY)
                    } else {
                        (StatusCode::OK, GENERATE_REPLY)
                    };
                    warp::reply::with_status(
                        warp::reply::with_header(reply, "content-type", "application/json"),
                        status,
                    )
                }
            });

        let tags_recorder = recorder.clone();
        let tags = warp::path!("api" / "tags").and(warp::get()).then(move || {
            let recorder = tags_recorder.clone();
            async move {
                recorder.tags_calls.fetch_add(1, Ordering::SeqCst);
                warp::reply::with_header(TAGS_REPLY, "content-type", "application/json")
            }
        });

        tokio::spawn(warp::serve(generate.or(tags)).incoming(listener).run());

        Self {
            url: format!("http://{}", addr),
            recorder,
        }
    }
}

pub fn gateway_config(ollama_url: &str) -> Config {
    Config::parse_from(["ollama-gateway", "--ollama-url", ollama_url])
}

pub async fn start_gateway(ollama_url: &str) -> ServingHandle {
    start_gateway_with(gateway_config(ollama_url)).await
}

pub async fn start_gateway_with(config: Config) -> ServingHandle {
    let server = GatewayServer::new(config).expect("gateway builds");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind gateway");
    server.serve(listener).expect("gateway serves")
}

/// Base URL of a port nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);
    format!("http://{}", addr)
}
