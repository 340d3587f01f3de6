use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "cadence_engine=trace"). When absent, `RUST_LOG` is consulted, then the
/// default level applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Maps a `-v` count onto a filter for the pacing crates.
    ///
    /// 0 keeps the default, 1 enables `debug` (idle transitions), 2 and up
    /// enable `trace` (per-frame wait counters).
    pub fn from_verbosity(verbose: u8) -> Self {
        let env_filter = match verbose {
            0 => None,
            1 => Some("info,cadence_engine=debug,cadence_host=debug".to_string()),
            _ => Some("info,cadence_engine=trace,cadence_host=trace".to_string()),
        };
        Self {
            env_filter,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(config.default_level);
        }

        builder.write_style(config.write_style);

        // Frame pacing logs are about sub-millisecond timing; the default
        // second-resolution timestamps hide everything interesting.
        builder.format_timestamp_micros();

        if let Err(e) = builder.try_init() {
            eprintln!("logger already installed: {e}");
            return;
        }

        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_zero_keeps_default() {
        let cfg = LoggingConfig::from_verbosity(0);
        assert!(cfg.env_filter.is_none());
        assert_eq!(cfg.default_level, log::LevelFilter::Info);
    }

    #[test]
    fn verbosity_maps_to_engine_filters() {
        let debug = LoggingConfig::from_verbosity(1).env_filter.unwrap();
        assert!(debug.contains("cadence_engine=debug"));
        let trace = LoggingConfig::from_verbosity(5).env_filter.unwrap();
        assert!(trace.contains("cadence_engine=trace"));
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig::from_verbosity(2));
    }
}
