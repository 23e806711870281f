// Error type shared by the library modules.
//
// Transport failures are deliberately absent here: `api::Transport` folds
// them into a synthesized response envelope instead of returning `Err`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A caller broke a documented precondition (for example an empty
    /// qualified name passed to `qname::get_qname`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required property (`apihost`, `apiversion`, ...) is not set.
    #[error("missing property: {0}")]
    MissingProperty(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
