use std::fmt;
use thiserror::Error;

/// The query parameter a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Year,
    NumericVar,
    CategoricalVar,
    LocationType,
    LocationCode,
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryField::Year => "year",
            QueryField::NumericVar => "numeric_var",
            QueryField::CategoricalVar => "categorical_var",
            QueryField::LocationType => "location_type",
            QueryField::LocationCode => "location_code",
        };
        f.write_str(name)
    }
}

/// A query parameter outside its legal set. Raised before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {field} '{value}': {reason}")]
pub struct ValidationError {
    pub field: QueryField,
    pub value: String,
    /// Names the legal values for `field`.
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: QueryField, value: impl ToString, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
