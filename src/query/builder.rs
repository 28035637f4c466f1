//! Validates a [`QuerySpec`] against the catalog and turns it into a request URL.

use crate::query::error::{QueryField, ValidationError};
use crate::types::catalog::{self, LocationType, WEIGHT_VARIABLE};
use crate::types::query::QuerySpec;

/// Default root of the data service.
pub const DEFAULT_BASE_URL: &str = "https://api.census.gov/data";

/// A query whose every field is known to be legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub year: i32,
    pub numeric_var: &'static str,
    pub categorical_var: &'static str,
    pub location: Option<(LocationType, String)>,
}

impl ValidatedQuery {
    /// Checks fields in order: year, numeric variable, categorical variable,
    /// location scope, location code. The first failure is returned.
    pub fn new(spec: &QuerySpec) -> Result<Self, ValidationError> {
        if !catalog::is_supported_year(spec.year) {
            let legal: Vec<String> = catalog::supported_years()
                .iter()
                .map(i32::to_string)
                .collect();
            return Err(ValidationError::new(
                QueryField::Year,
                spec.year,
                format!(
                    "year must be between {} and {} excluding {} (one of {})",
                    catalog::FIRST_YEAR,
                    catalog::LAST_YEAR,
                    catalog::MISSING_YEAR,
                    legal.join(", ")
                ),
            ));
        }

        let numeric_var = catalog::numeric_variable(&spec.numeric_var)
            .map(|entry| entry.name)
            .ok_or_else(|| {
                ValidationError::new(
                    QueryField::NumericVar,
                    &spec.numeric_var,
                    format!(
                        "numeric variable must be one of {}",
                        catalog::numeric_names().join(", ")
                    ),
                )
            })?;

        let categorical_var = catalog::categorical_variable(&spec.categorical_var)
            .map(|entry| entry.name)
            .ok_or_else(|| {
                ValidationError::new(
                    QueryField::CategoricalVar,
                    &spec.categorical_var,
                    format!(
                        "categorical variable must be one of {}",
                        catalog::categorical_names().join(", ")
                    ),
                )
            })?;

        let location_type: LocationType = spec.location_type.parse().map_err(|_| {
            let legal: Vec<&str> = LocationType::ALL_VALUES.iter().map(|l| l.as_str()).collect();
            ValidationError::new(
                QueryField::LocationType,
                &spec.location_type,
                format!("location type must be one of {}", legal.join(", ")),
            )
        })?;

        let location = match location_type {
            LocationType::All => None,
            scoped => {
                let code = spec.location_code.trim();
                if code.is_empty() {
                    return Err(ValidationError::new(
                        QueryField::LocationCode,
                        &spec.location_code,
                        format!("a location code is required when location type is {scoped}"),
                    ));
                }
                if !code.chars().all(is_location_code_char) {
                    return Err(ValidationError::new(
                        QueryField::LocationCode,
                        &spec.location_code,
                        "a location code may only contain digits, '*' and ','",
                    ));
                }
                Some((scoped, code.to_string()))
            }
        };

        Ok(Self {
            year: spec.year,
            numeric_var,
            categorical_var,
            location,
        })
    }

    /// Variables in request order. The weight is always last.
    pub fn variables(&self) -> [&'static str; 3] {
        [self.numeric_var, self.categorical_var, WEIGHT_VARIABLE]
    }

    /// `<base>/<year>/acs/acs1/pums?get=<numeric>,<categorical>,PWGTP[&for=<scope>:<code>]`
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/{}/acs/acs1/pums?get={}",
            base_url.trim_end_matches('/'),
            self.year,
            self.variables().join(",")
        );
        if let Some((location_type, code)) = &self.location {
            if let Some(segment) = location_type.url_segment() {
                url.push_str(&format!("&for={segment}:{code}"));
            }
        }
        url
    }
}

/// Geography codes are numeric; `*` is the wildcard and `,` separates several codes.
fn is_location_code_char(c: char) -> bool {
    c.is_ascii_digit() || c == '*' || c == ','
}

/// Validates `spec` and builds its request URL under `base_url`.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the offending field and its legal values.
///
/// # Examples
///
/// ```
/// use acs_pums::{build_query_url, QuerySpec, DEFAULT_BASE_URL};
///
/// let spec = QuerySpec::builder()
///     .year(2022)
///     .numeric_var("AGEP")
///     .categorical_var("SEX")
///     .location_type("STATE")
///     .location_code("19")
///     .build();
/// let url = build_query_url(DEFAULT_BASE_URL, &spec).unwrap();
/// assert_eq!(
///     url,
///     "https://api.census.gov/data/2022/acs/acs1/pums?get=AGEP,SEX,PWGTP&for=state:19"
/// );
/// ```
pub fn build_query_url(base_url: &str, spec: &QuerySpec) -> Result<String, ValidationError> {
    ValidatedQuery::new(spec).map(|query| query.url(base_url))
}

/// `<base>/<year>/acs/acs1/pums/variables/<VAR>.json`
pub fn metadata_url(base_url: &str, year: i32, variable: &str) -> String {
    format!(
        "{}/{}/acs/acs1/pums/variables/{}.json",
        base_url.trim_end_matches('/'),
        year,
        variable
    )
}
