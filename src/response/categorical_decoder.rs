//! Relabels a column of categorical codes through the variable's code table.
//!
//! Labels are addressed by position in the code-ordered table, offset by the
//! variable's first code. Every catalog variable numbers its codes from 0 except
//! `SEX`, whose table has no 0 entry and whose codes are `1` and `2`.

use crate::error::PumsError;
use crate::response::error::{DomainError, SchemaError};
use crate::types::catalog::{self, CatalogEntry};
use crate::types::code_table::CodeTable;

/// A code table prepared for decoding one categorical variable.
#[derive(Debug, Clone)]
pub struct CategoricalDecoder<'a> {
    variable: &'static CatalogEntry,
    labels: Vec<&'a str>,
}

impl<'a> CategoricalDecoder<'a> {
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownCategorical`] if `variable_name` is not a
    /// categorical catalog variable.
    pub fn new(table: &'a CodeTable, variable_name: &str) -> Result<Self, SchemaError> {
        let variable = catalog::categorical_variable(variable_name)
            .ok_or_else(|| SchemaError::UnknownCategorical(variable_name.to_string()))?;
        Ok(Self {
            variable,
            labels: table.labels(),
        })
    }

    pub fn first_code(&self) -> u32 {
        self.variable.first_code
    }

    /// Last code with a label, or `None` for an empty table.
    pub fn last_code(&self) -> Option<u32> {
        (self.labels.len() as u32).checked_sub(1).map(|n| n + self.first_code())
    }

    /// Label for one raw code string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CategoricalCode`] if the code is not an integer in the
    /// variable's domain.
    pub fn decode_code(&self, raw: &str) -> Result<&'a str, DomainError> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .and_then(|code| code.checked_sub(self.first_code()))
            .and_then(|index| self.labels.get(index as usize).copied())
            .ok_or_else(|| DomainError::CategoricalCode {
                variable: self.variable.name.to_string(),
                code: raw.to_string(),
                first: self.first_code(),
                last: self.last_code().unwrap_or(self.first_code()),
            })
    }

    /// The code a decoded label came from.
    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.labels
            .iter()
            .position(|candidate| *candidate == label)
            .map(|index| index as u32 + self.first_code())
    }

    pub fn decode_column(&self, column: &[String]) -> Result<Vec<String>, DomainError> {
        column
            .iter()
            .map(|raw| self.decode_code(raw).map(str::to_string))
            .collect()
    }
}

/// Decodes a raw code column of `variable_name` into labels.
///
/// # Errors
///
/// [`SchemaError::UnknownCategorical`] for a variable outside the catalog,
/// [`DomainError::CategoricalCode`] for the first code outside its domain.
pub fn decode(column: &[String], table: &CodeTable, variable_name: &str) -> Result<Vec<String>, PumsError> {
    let decoder = CategoricalDecoder::new(table, variable_name)?;
    Ok(decoder.decode_column(column)?)
}
