//! Error model for reading and deriving Polygon packages
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolygonError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("malformed statement properties {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("unsupported statement charset '{0}'")]
    UnknownCharset(String),

    #[error("package description must be an .xml file, found {0}")]
    NotXml(PathBuf),

    #[error("expected root tag <{expected}>, found <{found}>")]
    WrongRoot { expected: &'static str, found: String },

    #[error("missing required node <{0}>")]
    MissingNode(String),

    #[error("<{tag}> is missing required attribute '{attribute}'")]
    MissingAttribute { tag: String, attribute: String },

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    #[error("test has unhandled method <{0}>")]
    UnhandledMethod(String),

    #[error("test {rank} is generated but has no cmd")]
    GeneratedWithoutCmd { rank: usize },

    #[error("test {rank} references unknown group '{group}'")]
    UnknownGroup { rank: usize, group: String },

    #[error("group '{group}' depends on unknown group '{dependency}'")]
    UnknownDependency { group: String, dependency: String },

    #[error("group '{0}' is declared more than once")]
    DuplicateGroup(String),

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Failure to express a test group as a strided rank range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("test group <{group}> cannot be added: ranks {} have no uniform stride", format_ranks(.ranks))]
    Inconsistent { group: String, ranks: Vec<usize> },
}

fn format_ranks(ranks: &[usize]) -> String {
    let inner = ranks
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", inner)
}
