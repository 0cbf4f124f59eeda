pub mod commands;
pub mod config;
pub mod core;
pub mod export;
pub mod extract;
pub mod host;

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Logs go to stderr; stdout carries protocol
/// messages. Calling this twice keeps the first subscriber.
pub fn init_tracing(level: Level) {
    let _ = tracing_subscriber::registry()
        .with(log_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// The resolved level is the only source; `RUST_LOG` is not consulted.
fn log_filter(level: Level) -> EnvFilter {
    EnvFilter::default().add_directive(level.into())
}
