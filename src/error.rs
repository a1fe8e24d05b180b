use std::path::PathBuf;

use thiserror::Error;

/// Which structural invariant a node failed when rendering.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNode {
    #[error("a parent node requires a tag")]
    MissingTag,

    #[error("a parent node requires at least one child")]
    NoChildren,

    #[error("a leaf node requires a value")]
    MissingValue,
}

/// Errors raised while parsing Markdown or rendering the resulting tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing closing delimiter `{delimiter}` in {text:?}")]
    UnbalancedDelimiter {
        delimiter: &'static str,
        text: String,
    },

    #[error("markdown does not contain a title")]
    MissingTitle,

    #[error("invalid node: {0}")]
    InvalidNode(InvalidNode),
}

/// Errors raised while building pages from files on disk.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to convert {path}: {source}")]
    Page { path: PathBuf, source: ParseError },
}
