//! Contains [`PumsFrame`], the normalized table returned by every query.

use crate::error::PumsError;
use polars::prelude::*;
use std::io::Write;

/// Name of the column added by multi-year queries.
pub const YEAR_COLUMN: &str = "year";

/// Which column plays which role, fixed by position when the response is parsed.
///
/// The service answers with the numeric variable first, the categorical variable
/// second and the weight third, followed by any geography columns. Roles are
/// assigned from those positions once, so later code addresses columns by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRoles {
    pub numeric: String,
    pub categorical: String,
    pub weight: String,
    pub geography: Vec<String>,
    /// Set once years have been stacked.
    pub year: Option<String>,
}

impl ColumnRoles {
    /// Column names in frame order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![
            self.numeric.as_str(),
            self.categorical.as_str(),
            self.weight.as_str(),
        ];
        names.extend(self.geography.iter().map(String::as_str));
        names.extend(self.year.as_deref());
        names
    }
}

/// A normalized PUMS table.
///
/// Column order is numeric (`f64`, clock-time codes already converted to minutes
/// after midnight), categorical (decoded labels), weight (`f64`), geography
/// (strings) and, for multi-year results, `year` (`i32`).
///
/// The type itself marks the table as PUMS data: the [`crate::Summarizable`] and
/// [`crate::Plottable`] capabilities are implemented for it.
#[derive(Debug, Clone)]
pub struct PumsFrame {
    frame: DataFrame,
    roles: ColumnRoles,
}

impl PumsFrame {
    pub(crate) fn new(frame: DataFrame, roles: ColumnRoles) -> Self {
        Self { frame, roles }
    }

    /// The underlying Polars `DataFrame`.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_inner(self) -> DataFrame {
        self.frame
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn numeric_values(&self) -> Result<Vec<f64>, PumsError> {
        self.f64_values(&self.roles.numeric)
    }

    pub fn weights(&self) -> Result<Vec<f64>, PumsError> {
        self.f64_values(&self.roles.weight)
    }

    pub fn labels(&self) -> Result<Vec<String>, PumsError> {
        Ok(self
            .frame
            .column(&self.roles.categorical)?
            .str()?
            .into_iter()
            .map(|label| label.unwrap_or_default().to_string())
            .collect())
    }

    /// Year of every record, or `None` for a single-year frame.
    pub fn years(&self) -> Result<Option<Vec<i32>>, PumsError> {
        let Some(name) = &self.roles.year else {
            return Ok(None);
        };
        Ok(Some(
            self.frame
                .column(name)?
                .i32()?
                .into_iter()
                .map(|year| year.unwrap_or_default())
                .collect(),
        ))
    }

    /// Distinct categorical labels in order of first appearance.
    pub fn categories(&self) -> Result<Vec<String>, PumsError> {
        let mut seen = Vec::new();
        for label in self.labels()? {
            if !seen.contains(&label) {
                seen.push(label);
            }
        }
        Ok(seen)
    }

    /// Keeps the records matching a Polars predicate.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use acs_pums::{Pums, PumsError};
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), PumsError> {
    /// let pums = Pums::builder().build()?;
    /// let ages = pums.fetch().year(2022).numeric("AGEP").categorical("SEX").call()?;
    /// let adults = ages.filter(col("AGEP").gt_eq(lit(18.0)))?;
    /// println!("{}", adults.frame());
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> Result<PumsFrame, PumsError> {
        let frame = self.frame.clone().lazy().filter(predicate).collect()?;
        Ok(PumsFrame::new(frame, self.roles.clone()))
    }

    /// Keeps the records whose categorical label equals `label`.
    pub fn filter_category(&self, label: &str) -> Result<PumsFrame, PumsError> {
        self.filter(col(self.roles.categorical.as_str()).eq(lit(label)))
    }

    /// Writes the table as CSV with a header row.
    pub fn write_csv<W: Write>(&mut self, writer: W) -> Result<(), PumsError> {
        CsvWriter::new(writer)
            .include_header(true)
            .finish(&mut self.frame)?;
        Ok(())
    }

    /// Appends a constant `year` column.
    pub(crate) fn with_year(mut self, year: i32) -> Result<Self, PumsError> {
        let years = Series::new(YEAR_COLUMN.into(), vec![year; self.frame.height()]);
        self.frame.with_column(Column::from(years))?;
        self.roles.year = Some(YEAR_COLUMN.to_string());
        Ok(self)
    }

    /// Stacks frames vertically in the given order. Roles come from the first frame.
    pub(crate) fn stack(frames: Vec<PumsFrame>) -> Result<Self, PumsError> {
        let mut frames = frames.into_iter();
        let Some(first) = frames.next() else {
            return Err(PumsError::DataFrame(PolarsError::NoData(
                "no frames to stack".into(),
            )));
        };
        let PumsFrame {
            frame: mut stacked,
            roles,
        } = first;
        for next in frames {
            stacked.vstack_mut(&next.frame)?;
        }
        Ok(PumsFrame::new(stacked, roles))
    }

    fn f64_values(&self, name: &str) -> Result<Vec<f64>, PumsError> {
        Ok(self
            .frame
            .column(name)?
            .f64()?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}
