//! Unified error model of a conversion run
use cats::CatsError;
use polygon::PolygonError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("INPUT/{0}")]
    Input(String),

    #[error("PACKAGE/{0}")]
    Package(#[from] PolygonError),

    #[error("TARGET/{0}")]
    Target(#[from] CatsError),

    #[error("COPY/{path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("COPY/{} and {} would both be copied to {}", .first.display(), .second.display(), .target.display())]
    Collision {
        target: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("ARCHIVE/{0}")]
    Archive(String),

    #[error("CONFIG/{0}")]
    Config(String),

    #[error("PACKAGE/expected exactly one testset, found {0}")]
    WrongTestsetCount(usize),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
