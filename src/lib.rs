mod error;
mod fetch;
mod frame;
mod pums;
mod query;
mod response;
mod types;

#[cfg(test)]
mod test_support;

pub use error::PumsError;
pub use pums::*;

pub use query::builder::{build_query_url, metadata_url, ValidatedQuery, DEFAULT_BASE_URL};
pub use query::error::{QueryField, ValidationError};
pub use types::query::QuerySpec;

pub use types::catalog;
pub use types::catalog::{CatalogEntry, LocationType, UnknownLocationType, VariableKind, CATALOG, WEIGHT_VARIABLE};
pub use types::code_table::CodeTable;
pub use types::raw_response::RawResponse;

pub use fetch::metadata::{parse_code_table, CodeTableSource, MetadataFetcher};
pub use fetch::transport::{HttpTransport, Transport};

pub use response::categorical_decoder::{decode, CategoricalDecoder};
pub use response::error::{DomainError, ParseError, SchemaError};
pub use response::interval_reference::{Interval, IntervalReference, NOT_APPLICABLE_CODE};
pub use response::normalizer::{convert_clock_times, normalize, parse_numeric, parse_weights};

pub use frame::plot::Plottable;
pub use frame::pums_frame::{ColumnRoles, PumsFrame, YEAR_COLUMN};
pub use frame::summary::{BoxStats, GroupSummary, Summarizable};
