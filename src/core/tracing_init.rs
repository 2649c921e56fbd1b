use crate::core::config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: the configured level for the
/// dashboard's own targets, warnings only for dependencies
fn default_directives(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Install the global subscriber
///
/// Logs go to stderr so they never interleave with dashboard output on
/// stdout.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    if config.console || config.format == "console" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(true)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(false)
                    .flatten_event(true),
            )
            .init();
    }
}
