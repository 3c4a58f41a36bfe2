//! Process-wide logging setup shared by the binaries.

use thiserror::Error;

/// Initialize tracing with the default configuration (JSON, `RUST_LOG` or `info`).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&LogConfig::default());
}

/// Subscriber construction (filters, formatters).
pub mod tracing;

/// Output format of the fmt subscriber.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        }
    }
}

impl core::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format `{0}` (expected json, pretty or compact)")]
pub struct UnknownLogFormat(pub String);

impl core::str::FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLogFormat(s.to_string()))
    }
}

/// What to install.
///
/// `filter` takes an `EnvFilter` directive string; when absent `RUST_LOG` is
/// consulted, then `info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub filter: Option<String>,
}

impl LogConfig {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!(
            "xml".parse::<LogFormat>().unwrap_err(),
            UnknownLogFormat("xml".into())
        );
    }

    #[test]
    fn default_config_is_json_without_filter() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, None);
        assert_eq!(
            LogConfig::new(LogFormat::Compact).with_filter("debug").filter.as_deref(),
            Some("debug")
        );
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        init();
        init();
        assert!(!crate::tracing::init_with(&LogConfig::new(LogFormat::Pretty)));
    }
}
