//! Turns a [`RawResponse`] into a typed, decoded [`PumsFrame`].

use crate::error::PumsError;
use crate::fetch::metadata::CodeTableSource;
use crate::frame::pums_frame::{ColumnRoles, PumsFrame};
use crate::response::categorical_decoder::CategoricalDecoder;
use crate::response::error::{ParseError, SchemaError};
use crate::response::interval_reference::IntervalReference;
use crate::types::catalog;
use crate::types::raw_response::RawResponse;
use log::debug;
use polars::prelude::*;

const NUMERIC_POSITION: usize = 0;
const CATEGORICAL_POSITION: usize = 1;
const WEIGHT_POSITION: usize = 2;

impl ColumnRoles {
    /// Assigns roles by position: numeric, categorical, weight, then geography.
    pub fn from_header(header: &[String]) -> Result<Self, SchemaError> {
        if header.len() <= WEIGHT_POSITION {
            return Err(SchemaError::TooFewColumns {
                found: header.len(),
            });
        }
        Ok(Self {
            numeric: header[NUMERIC_POSITION].clone(),
            categorical: header[CATEGORICAL_POSITION].clone(),
            weight: header[WEIGHT_POSITION].clone(),
            geography: header[WEIGHT_POSITION + 1..].to_vec(),
            year: None,
        })
    }
}

/// Coerces a string column to `f64`.
///
/// # Errors
///
/// Returns [`ParseError::NotANumber`] for the first value that does not parse to a
/// finite number. `NaN` and infinities are rejected.
pub fn parse_numeric(column: &str, values: &[String]) -> Result<Vec<f64>, ParseError> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| ParseError::NotANumber {
                    column: column.to_string(),
                    row: i + 1,
                    value: value.clone(),
                })
        })
        .collect()
}

/// Parses the weight column. Person weights are whole numbers.
///
/// # Errors
///
/// [`ParseError::NotANumber`] as for [`parse_numeric`], and
/// [`ParseError::FractionalWeight`] for the first weight with a fractional part.
pub fn parse_weights(column: &str, values: &[String]) -> Result<Vec<f64>, ParseError> {
    let weights = parse_numeric(column, values)?;
    match weights.iter().position(|weight| weight.fract() != 0.0) {
        Some(i) => Err(ParseError::FractionalWeight {
            column: column.to_string(),
            row: i + 1,
            value: values[i].clone(),
        }),
        None => Ok(weights),
    }
}

/// Replaces clock-time interval codes of `variable` with minutes after midnight.
/// Zeros are left as they are.
///
/// # Errors
///
/// [`SchemaError::UnknownInterval`] if `variable` is not interval-coded, plus any
/// error from fetching the code table or building its reference.
pub fn convert_clock_times<S>(variable: &str, values: Vec<f64>, tables: &S) -> Result<Vec<f64>, PumsError>
where
    S: CodeTableSource + ?Sized,
{
    if !catalog::is_interval_coded(variable) {
        return Err(SchemaError::UnknownInterval(variable.to_string()).into());
    }
    let table = tables.code_table(variable)?;
    let reference = IntervalReference::build(&table)?;
    debug!(
        "Built interval reference for {} with {} intervals",
        variable,
        reference.len()
    );
    Ok(values
        .into_iter()
        .map(|value| reference.translate(value))
        .collect::<Result<_, _>>()?)
}

/// Parses the raw matrix into a [`PumsFrame`].
///
/// Columns are read by position: the first is the numeric variable, the second
/// the categorical variable and the third the weight; any further columns are
/// geography and kept as strings. Column names only decide which transforms
/// apply: a numeric column named for an interval-coded variable is converted to
/// minutes after midnight, and the categorical column is decoded through the
/// code table of the variable it is named after.
///
/// # Errors
///
/// Every failure aborts the whole call; no partial table is returned.
pub fn normalize<S>(raw: RawResponse, tables: &S) -> Result<PumsFrame, PumsError>
where
    S: CodeTableSource + ?Sized,
{
    let (header, rows) = raw.into_parts()?;
    let roles = ColumnRoles::from_header(&header)?;

    let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(rows.len()); header.len()];
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    let mut numeric = parse_numeric(&roles.numeric, &columns[NUMERIC_POSITION])?;
    let weight = parse_weights(&roles.weight, &columns[WEIGHT_POSITION])?;

    if catalog::is_interval_coded(&roles.numeric) {
        numeric = convert_clock_times(&roles.numeric, numeric, tables)?;
    }

    // Reject unknown variables before asking the service for their table.
    if catalog::categorical_variable(&roles.categorical).is_none() {
        return Err(SchemaError::UnknownCategorical(roles.categorical.clone()).into());
    }
    let table = tables.code_table(&roles.categorical)?;
    let labels = CategoricalDecoder::new(&table, &roles.categorical)?
        .decode_column(&columns[CATEGORICAL_POSITION])?;

    let mut frame_columns = vec![
        Column::from(Series::new(roles.numeric.as_str().into(), numeric)),
        Column::from(Series::new(roles.categorical.as_str().into(), labels)),
        Column::from(Series::new(roles.weight.as_str().into(), weight)),
    ];
    for (name, values) in roles
        .geography
        .iter()
        .zip(columns.iter().skip(WEIGHT_POSITION + 1))
    {
        frame_columns.push(Column::from(Series::new(name.as_str().into(), values.clone())));
    }

    let frame = DataFrame::new(frame_columns)?;
    debug!(
        "Normalized {} rows of {} by {}",
        frame.height(),
        roles.numeric,
        roles.categorical
    );
    Ok(PumsFrame::new(frame, roles))
}
