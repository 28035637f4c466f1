use thiserror::Error;

/// A response body, label or value that could not be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response body is not a JSON array of string rows")]
    ResponseJson(#[source] serde_json::Error),

    #[error("Metadata for variable '{variable}' is not valid JSON")]
    MetadataJson {
        variable: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Value '{value}' in column '{column}' (row {row}) is not a number")]
    NotANumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Weight '{value}' in column '{column}' (row {row}) is not a whole number")]
    FractionalWeight {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Code '{code}' in the code table of '{variable}' is not a non-negative integer")]
    CodeKey { variable: String, code: String },

    #[error("Label '{label}' for code {code} of '{variable}' does not contain two clock times")]
    IntervalLabel {
        variable: String,
        code: u32,
        label: String,
    },
}

/// The response does not have the shape the pipeline expects.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Response contains no header row")]
    MissingHeader,

    #[error("Response header has {found} columns, at least 3 are required (numeric, categorical, weight)")]
    TooFewColumns { found: usize },

    #[error("Row {row} has {found} values but the header has {expected} columns")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column '{0}' is not a known categorical variable")]
    UnknownCategorical(String),

    #[error("Column '{0}' is not a known interval-coded variable")]
    UnknownInterval(String),

    #[error("Metadata for variable '{0}' has no code table")]
    MissingCodeTable(String),

    #[error("Response column {position} is '{found}', expected '{expected}'")]
    HeaderMismatch {
        position: usize,
        expected: String,
        found: String,
    },
}

/// A code that has no meaning for its variable.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Code '{code}' is outside the domain of '{variable}' (legal codes {first}..={last})")]
    CategoricalCode {
        variable: String,
        code: String,
        first: u32,
        last: u32,
    },

    #[error("Code '{code}' has no entry in the interval reference of '{variable}'")]
    IntervalCode { variable: String, code: String },
}
