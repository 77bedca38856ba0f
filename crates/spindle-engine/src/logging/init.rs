use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax, e.g.
/// `"spindle_engine=trace,wgpu_core=warn"`. When unset, `RUST_LOG` is used,
/// then `default_filter`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_filter: String,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            // wgpu is chatty at info.
            default_filter: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_owned(),
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(&config, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized with filter `{filter}`");
    });
}

fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> String {
    config
        .env_filter
        .clone()
        .or(rust_log.filter(|f| !f.trim().is_empty()))
        .unwrap_or_else(|| config.default_filter.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig { env_filter: Some("debug".into()), ..Default::default() };
        assert_eq!(resolve_filter(&config, Some("trace".into())), "debug");
    }

    #[test]
    fn rust_log_beats_default() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("spindle_engine=trace".into())), "spindle_engine=trace");
    }

    #[test]
    fn blank_rust_log_falls_back() {
        let config = LoggingConfig::default();
        assert_eq!(resolve_filter(&config, Some("  ".into())), config.default_filter);
        assert!(resolve_filter(&config, None).starts_with("info"));
    }
}
