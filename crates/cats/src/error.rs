//! Errors raised while building and writing the CATS document
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatsError {
    #[error("BUILD/declaration name '{0}' is already used")]
    DuplicateName(String),

    #[error("BUILD/problem has no title")]
    MissingTitle,

    #[error("BUILD/test {rank} cannot be written: {reason}")]
    InvalidTest { rank: usize, reason: String },

    #[error("WRITE/{0}")]
    Write(String),

    #[error("WRITE/failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
