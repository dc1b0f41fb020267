//! `tracing` subscriber setup.
//!
//! The library crates only emit events; binaries decide where they go.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for a filter directive (e.g. `quokka_css=trace`).
pub const LOG_ENV: &str = "QUOKKA_LOG";

/// Map a `-v` count onto a default filter level.
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a formatting subscriber writing to stderr.
///
/// `QUOKKA_LOG` wins over `verbosity` when it is set. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(3);
    }
}
