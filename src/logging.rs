use std::fmt::Write;
use std::time::{Duration, Instant};

use log::Level;

/// One info line per accepted request; the model is caller text and gets escaped.
pub fn log_request(route: &str, model: Option<&str>) {
    match model {
        Some(m) => log::info!("{} (model: {})", route, sanitize_log_message(m)),
        None => log::info!("{}", route),
    }
}

pub fn log_timed(level: Level, operation: &str, start: Instant) {
    log::log!(level, "{} | {}", operation, format_duration(start.elapsed()));
}

pub fn format_duration(duration: Duration) -> String {
    match duration.as_millis() {
        0 => format!("{:.1}µs", duration.as_secs_f64() * 1e6),
        1..=999 => format!("{:.2}ms", duration.as_secs_f64() * 1e3),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

/// Escapes every control character, line breaks included, so caller-supplied
/// text stays on a single log line.
pub fn sanitize_log_message(message: &str) -> String {
    let mut sanitized = String::with_capacity(message.len());
    for c in message.chars() {
        if c.is_control() {
            let _ = write!(sanitized, "{}", c.escape_debug());
        } else {
            sanitized.push(c);
        }
    }
    sanitized
}

/// Dumps the exact payload sent upstream when debug logging is on.
pub fn log_upstream_payload(endpoint: &str, payload: &serde_json::Value) {
    if log::log_enabled!(Level::Debug) {
        log::debug!(
            "{} upstream request: {}",
            endpoint,
            sanitize_log_message(&payload.to_string())
        );
    }
}
