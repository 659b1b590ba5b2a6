//! Logging setup on top of `tracing-subscriber`.
//!
//! Logs go to stderr so stdout stays clean for captions and JSON output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Install the subscriber from the `[logging]` section, with CLI flags on top.
pub fn init_from_config(
    config: &memefier_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let (verbose, json_format) = resolve(config, verbose_override, json_logs_override);
    init(verbose, json_format);
}

fn resolve(config: &memefier_core::Config, verbose: bool, json_logs: bool) -> (bool, bool) {
    let level = config.logging.level.to_ascii_lowercase();
    (
        verbose || level == "debug" || level == "trace",
        json_logs || config.logging.format == "json",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use memefier_core::Config;

    #[test]
    fn test_defaults_are_quiet_and_pretty() {
        assert_eq!(resolve(&Config::default(), false, false), (false, false));
    }

    #[test]
    fn test_config_level_and_format() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".into();
        config.logging.format = "json".into();
        assert_eq!(resolve(&config, false, false), (true, true));
    }

    #[test]
    fn test_flags_override_config() {
        assert_eq!(resolve(&Config::default(), true, true), (true, true));
    }
}
