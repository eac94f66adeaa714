use std::sync::Once;

use env_logger::WriteStyle;
use log::LevelFilter;

/// How a binary wants trellis diagnostics printed.
///
/// The crates log by target: `trellis_ui::skeleton` traces every realized
/// cell, `trellis_ui::rows` reports row mutations at debug, and
/// `trellis_ui::proxy` warns when a proxy fires with no controller attached.
/// A filter such as `"warn,trellis_ui::rows=debug"` narrows output to one of
/// them.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives. Takes precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    /// Level used when neither a filter nor `RUST_LOG` is given.
    pub fallback: LevelFilter,
    pub write_style: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { env_filter: None, fallback: LevelFilter::Info, write_style: WriteStyle::Auto }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_fallback(mut self, level: LevelFilter) -> Self {
        self.fallback = level;
        self
    }

    pub fn with_write_style(mut self, style: WriteStyle) -> Self {
        self.write_style = style;
        self
    }

    /// The directives actually applied: the explicit filter, then `RUST_LOG`.
    fn directives(&self) -> Option<String> {
        self.env_filter.clone().or_else(|| std::env::var("RUST_LOG").ok())
    }
}

static INIT: Once = Once::new();

/// Installs the `env_logger` backend for the process.
///
/// Only the first call has any effect. Library crates never call this.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.directives() {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.filter_level(config.fallback),
        };
        builder.write_style(config.write_style).init();
        log::debug!("trellis logging ready");
    });
}
