//! The request-scoped query specification.

use bon::Builder;

/// What to ask the data service for.
///
/// Fields are kept as plain strings so that anything a caller hands over can be
/// checked against the catalog, with a [`crate::ValidationError`] naming the legal
/// values when it does not fit. Validation happens in [`crate::build_query_url`].
///
/// # Examples
///
/// ```
/// use acs_pums::QuerySpec;
///
/// let spec = QuerySpec::builder()
///     .year(2022)
///     .numeric_var("AGEP")
///     .categorical_var("SEX")
///     .location_type("STATE")
///     .location_code("19")
///     .build();
/// assert_eq!(spec.location_code, "19");
///
/// // Without a location the query is nationwide.
/// let nationwide = QuerySpec::builder().year(2019).numeric_var("JWAP").categorical_var("HHT").build();
/// assert_eq!(nationwide.location_type, "ALL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct QuerySpec {
    pub year: i32,
    #[builder(into)]
    pub numeric_var: String,
    #[builder(into)]
    pub categorical_var: String,
    /// One of `ALL`, `REGION`, `DIVISION`, `STATE`.
    #[builder(into, default = String::from("ALL"))]
    pub location_type: String,
    /// Geography code for the chosen scope, e.g. a state FIPS code. Ignored for `ALL`.
    #[builder(into, default)]
    pub location_code: String,
}
