//! Process-wide tracing subscriber.

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Map a CLI level name to a tracing level. Unknown names fall back to INFO.
pub fn parse_level(name: &str) -> Level {
    match name.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the fmt subscriber once. `RUST_LOG` directives are honoured on
/// top of `log_level`. Later calls are no-ops.
pub fn setup_logging(log_level: &str, json: bool) {
    let level = parse_level(log_level);
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(level.into());
        let result = if json {
            tracing_subscriber::fmt()
                .json()
                .with_target(true)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        } else {
            tracing_subscriber::fmt()
                .with_target(true)
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        };
        // a test harness may have installed a subscriber already
        if result.is_ok() {
            tracing::debug!(log_level = %level, json, "logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("Warning"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn setup_is_idempotent() {
        setup_logging("info", false);
        setup_logging("debug", true);
    }
}
