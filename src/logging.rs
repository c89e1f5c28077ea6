//! Diagnostic logging for the `kouch` binary.
//!
//! Logs go to stderr so they never mix with response output on stdout.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::KouchError;

/// Level used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Level used with `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns [`KouchError::Logging`] if a global subscriber is already set.
pub fn init(verbose: bool) -> Result<(), KouchError> {
    tracing_subscriber::registry()
        .with(env_filter(level(verbose)))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init()?;
    Ok(())
}

fn level(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level() {
        assert_eq!(level(false), "warn");
        assert_eq!(level(true), "debug");
    }

    #[test]
    fn second_init_is_an_error() {
        // The first call may fail too if another test installed a subscriber.
        let _ = init(false);
        assert!(matches!(init(false), Err(KouchError::Logging(_))));
    }
}
