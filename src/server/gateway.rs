use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::Level;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use warp::Filter;

use crate::config::Config;
use crate::error::ServerError;
use crate::http::client::build_client;
use crate::logging::{format_duration, log_timed};
use crate::server::routes::{Routes, create_routes};
use crate::server::{GatewayState, handle_rejection};

pub struct GatewayServer {
    config: Config,
    routes: Routes,
}

impl GatewayServer {
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let client = build_client(config.upstream_timeout()).map_err(ServerError::Client)?;

        let state = Arc::new(GatewayState {
            client,
            ollama_url: config.upstream_base().to_string(),
        });
        let routes = create_routes(state);
        log::debug!("routes registered: POST /generate, GET /models");

        Ok(Self { config, routes })
    }

    /// Serves until SIGINT/SIGTERM, then drains within the configured bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.listen_addr().map_err(ServerError::Config)?;
        let shutdown_timeout = self.config.shutdown_timeout();

        let handle = self.spawn(addr);
        log::debug!("listener task spawned for {}", handle.local_addr());

        let signal = wait_for_shutdown_signal().await?;
        log::info!("received {} signal", signal);

        handle.shutdown(shutdown_timeout).await
    }

    /// Binds `addr` on the serving task. A bind failure is logged there and
    /// leaves the process waiting for a shutdown signal.
    pub fn spawn(self, addr: SocketAddr) -> ServingHandle {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let routes = self.routes;
        let ollama_url = self.config.upstream_base().to_string();

        let task = tokio::spawn(async move {
            let listener = match TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(e) => {
                    log::error!("HTTP server error: {}", e);
                    return;
                }
            };
            log_serving(addr, &ollama_url);
            serve_routes(routes, listener, token).await;
        });

        ServingHandle {
            task,
            shutdown,
            local_addr: addr,
        }
    }

    /// Serves on an already bound listener.
    pub fn serve(self, listener: TcpListener) -> Result<ServingHandle, ServerError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Listener(e.to_string()))?;
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let routes = self.routes;

        log_serving(local_addr, self.config.upstream_base());
        let task = tokio::spawn(serve_routes(routes, listener, token));

        Ok(ServingHandle {
            task,
            shutdown,
            local_addr,
        })
    }
}

/// A running listener task and the means to stop it.
pub struct ServingHandle {
    task: JoinHandle<()>,
    shutdown: CancellationToken,
    local_addr: SocketAddr,
}

impl ServingHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting connections and waits up to `timeout` for in-flight
    /// requests. Requests still running at the deadline are left to finish
    /// on their own; the call returns `ShutdownTimeout`.
    pub async fn shutdown(self, timeout: Duration) -> Result<(), ServerError> {
        log::info!(
            "shutting down, waiting up to {} for in-flight requests",
            format_duration(timeout)
        );
        let start = Instant::now();
        self.shutdown.cancel();

        match tokio::time::timeout(timeout, self.task).await {
            Ok(Ok(())) => {
                log_timed(Level::Info, "server stopped", start);
                Ok(())
            }
            Ok(Err(e)) => Err(ServerError::Listener(e.to_string())),
            Err(_) => {
                log_timed(Level::Warn, "shutdown deadline reached", start);
                Err(ServerError::ShutdownTimeout(timeout))
            }
        }
    }
}

async fn serve_routes(routes: Routes, listener: TcpListener, shutdown: CancellationToken) {
    warp::serve(routes.recover(handle_rejection))
        .incoming(listener)
        .graceful(shutdown.cancelled_owned())
        .run()
        .await;
}

fn log_serving(addr: SocketAddr, ollama_url: &str) {
    if log::log_enabled!(Level::Debug) {
        log::info!("starting gateway on {} (debug mode)", addr);
    } else {
        log::info!("starting gateway on {}", addr);
    }
    log::info!("Ollama backend: {}", ollama_url);
}

async fn wait_for_shutdown_signal() -> Result<&'static str, ServerError> {
    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .map_err(ServerError::Signal)?;

    #[cfg(unix)]
    let terminate = sigterm.recv();
    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.map_err(ServerError::Signal)?;
            Ok("interrupt")
        }
        _ = terminate => Ok("terminate"),
    }
}
