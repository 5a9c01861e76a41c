//! CLI error types.

use std::path::PathBuf;

use fir_config::ConfigError;
use fir_source::SourceError;
use fir_template::TemplateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{}:{line}: {source}", .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Validation(String),
}
