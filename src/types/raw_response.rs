//! The service's raw string-matrix response.

use crate::response::error::{ParseError, SchemaError};

/// Rows of strings exactly as the service returned them. Row 0 is the header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    rows: Vec<Vec<String>>,
}

impl RawResponse {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Parses a response body: a JSON array of arrays of strings.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ResponseJson`] for anything else, including an empty body.
    pub fn from_json(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice::<Vec<Vec<String>>>(body)
            .map(Self::new)
            .map_err(ParseError::ResponseJson)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Number of data rows, not counting the header.
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Splits off the header and checks every data row has the header's width.
    pub(crate) fn into_parts(self) -> Result<(Vec<String>, Vec<Vec<String>>), SchemaError> {
        let mut rows = self.rows.into_iter();
        let header = rows.next().ok_or(SchemaError::MissingHeader)?;
        let data: Vec<Vec<String>> = rows.collect();
        for (i, row) in data.iter().enumerate() {
            if row.len() != header.len() {
                return Err(SchemaError::RowWidth {
                    row: i + 1,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        Ok((header, data))
    }
}
