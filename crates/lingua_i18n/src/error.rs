use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("resource file {path}: {msg}")]
    Parse { path: PathBuf, msg: String },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
