use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a knowledge base.
#[derive(Error, Debug)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("knowledge base is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("knowledge base must be a list of records or an object with a `data` list, got {0}")]
    NotASequence(&'static str),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
}

/// Failures while building an [`Analyzer`](crate::analysis::Analyzer) from configuration.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid section pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
