//! Structured Logging Configuration
//!
//! Configurable logging for all Taskboard binaries:
//! - JSON output for production (`LOG_FORMAT=json`)
//! - Human-readable output for development (default)
//!
//! Log levels are controlled through the standard `RUST_LOG` filter,
//! e.g. `RUST_LOG=tb_platform=debug,tower_http=info`. The default level
//! is `info`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize logging for the given service.
///
/// Reads `LOG_FORMAT` to pick the output format ("json" for machine-readable
/// output, anything else for text) and `RUST_LOG` for level filtering.
pub fn init_logging(_service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_output = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .init();
    }
}
