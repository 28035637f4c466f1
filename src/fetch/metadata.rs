//! Fetches a variable's code table from the service metadata.

use crate::error::PumsError;
use crate::fetch::transport::Transport;
use crate::query::builder::metadata_url;
use crate::response::error::{ParseError, SchemaError};
use crate::types::code_table::CodeTable;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Anything that can produce the code table of a variable.
pub trait CodeTableSource {
    fn code_table(&self, variable: &str) -> Result<CodeTable, PumsError>;
}

/// Tables already in memory, looked up by variable name.
impl CodeTableSource for [CodeTable] {
    fn code_table(&self, variable: &str) -> Result<CodeTable, PumsError> {
        self.iter()
            .find(|table| table.variable() == variable)
            .cloned()
            .ok_or_else(|| SchemaError::MissingCodeTable(variable.to_string()).into())
    }
}

#[derive(Debug, Deserialize)]
struct VariableMetadata {
    #[serde(default)]
    values: Option<ValueSet>,
}

#[derive(Debug, Deserialize)]
struct ValueSet {
    #[serde(default)]
    item: Option<BTreeMap<String, String>>,
}

/// Parses a `variables/<VAR>.json` body into a [`CodeTable`].
///
/// The body is an object whose `values.item` member maps code strings to labels.
pub fn parse_code_table(variable: &str, body: &[u8]) -> Result<CodeTable, PumsError> {
    let metadata: VariableMetadata =
        serde_json::from_slice(body).map_err(|source| ParseError::MetadataJson {
            variable: variable.to_string(),
            source,
        })?;
    let items = metadata
        .values
        .and_then(|values| values.item)
        .ok_or_else(|| SchemaError::MissingCodeTable(variable.to_string()))?;
    Ok(CodeTable::from_string_codes(variable, items)?)
}

/// Code table fetcher for one survey year. Every call performs a fresh request.
#[derive(Debug, Clone)]
pub struct MetadataFetcher<'a, T: Transport> {
    transport: &'a T,
    base_url: &'a str,
    year: i32,
}

impl<'a, T: Transport> MetadataFetcher<'a, T> {
    pub fn new(transport: &'a T, base_url: &'a str, year: i32) -> Self {
        Self {
            transport,
            base_url,
            year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl<T: Transport> CodeTableSource for MetadataFetcher<'_, T> {
    fn code_table(&self, variable: &str) -> Result<CodeTable, PumsError> {
        let url = metadata_url(self.base_url, self.year, variable);
        debug!("Fetching code table for {} ({})", variable, self.year);
        let body = self.transport.get(&url)?;
        let table = parse_code_table(variable, &body)?;
        debug!("Code table for {} has {} entries", variable, table.len());
        Ok(table)
    }
}
