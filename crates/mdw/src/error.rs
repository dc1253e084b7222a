//! CLI error types.

use mdw_config::ConfigError;
use mdw_docx::DocxError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Docx(#[from] DocxError),
}
