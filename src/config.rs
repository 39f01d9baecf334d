use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "ollama-gateway")]
#[command(about = "minimal http gateway in front of a local ollama daemon")]
pub struct Config {
    #[arg(long, default_value = "0.0.0.0:8080", help = "server listen address")]
    pub listen: String,

    #[arg(
        long,
        default_value = "http://localhost:11434",
        help = "ollama daemon base url"
    )]
    pub ollama_url: String,

    #[arg(
        long,
        default_value = "info",
        help = "log level (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[arg(
        long,
        default_value = "5s",
        help = "how long shutdown waits for in-flight requests"
    )]
    pub shutdown_timeout: humantime::Duration,

    #[arg(
        long,
        help = "max idle time waiting on the daemon for headers or the next body chunk (unset: wait forever)"
    )]
    pub upstream_timeout: Option<humantime::Duration>,
}

impl Config {
    pub fn listen_addr(&self) -> Result<SocketAddr, String> {
        self.listen
            .parse::<SocketAddr>()
            .map_err(|_| format!("invalid listen address: {}", self.listen))
    }

    /// Base URL without a trailing slash, ready for endpoint concatenation.
    pub fn upstream_base(&self) -> &str {
        self.ollama_url.trim_end_matches('/')
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout.into()
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout.map(Into::into)
    }
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    config.listen_addr()?;
    if !config.ollama_url.starts_with("http://") && !config.ollama_url.starts_with("https://") {
        return Err(format!(
            "invalid Ollama URL (must start with http:// or https://): {}",
            config.ollama_url
        ));
    }
    if let Err(e) = url::Url::parse(&config.ollama_url) {
        return Err(format!("invalid Ollama URL format: {}", e));
    }
    Ok(())
}
