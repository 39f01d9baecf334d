use std::process::ExitCode;

use clap::Parser;

mod config;
mod constants;
mod error;
mod handlers;
mod http;
mod logging;
mod server;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cfg = config::Config::parse();

    config::validate_config(&cfg)?;

    setup_logging(&cfg.log_level)?;

    let server = server::GatewayServer::new(cfg)?;
    let outcome = server.run().await;

    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Process status for the outcome of `run`: 0 on clean shutdown, 1 otherwise.
fn exit_status(outcome: &Result<(), error::ServerError>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(e) => {
            log::error!("server error: {}", e);
            1
        }
    }
}

fn setup_logging(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let level = log_level
        .to_lowercase()
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            let level_str = match record.level() {
                log::Level::Error => "\x1b[1;31merror:\x1b[0m",
                log::Level::Warn => "\x1b[1;33mwarn:\x1b[0m",
                log::Level::Info => "\x1b[1;32minfo:\x1b[0m",
                log::Level::Debug => "\x1b[1;34mdebug:\x1b[0m",
                log::Level::Trace => "\x1b[1;35mtrace:\x1b[0m",
            };
            out.finish(format_args!("{} {}", level_str, message))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;

    Ok(())
}
