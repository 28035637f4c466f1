use crate::query::error::ValidationError;
use crate::response::error::{DomainError, ParseError, SchemaError};
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PumsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
