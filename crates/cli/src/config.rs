//! Runtime settings assembled from flags and environment.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use thiserror::Error;

use projboard_observability::{LogConfig, LogFormat};

use crate::cli::{Cli, LogFormatArg};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log: LogConfig,
    pub script: Option<PathBuf>,
    pub quiet: bool,
}

impl Settings {
    /// `--log-level` wins over `RUST_LOG`; without it the filter is left to the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        let format = match cli.log_format {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        };
        let mut log = LogConfig::new(format);
        if let Some(level) = cli.log_level {
            log = log.with_filter(level.as_directive());
        }

        Self {
            log,
            script: cli.script.clone(),
            quiet: cli.quiet,
        }
    }

    /// Command source: the script file if one was given, stdin otherwise.
    pub fn open_input(&self) -> Result<Box<dyn BufRead>, ConfigError> {
        match &self.script {
            Some(path) => {
                let file = File::open(path).map_err(|source| ConfigError::Script {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }
}
