//! This module provides the main entry point for querying ACS public use microdata.
//! A [`Pums`] client validates a query, fetches the matching records, and returns
//! them as a normalized [`PumsFrame`], either for one survey year or stacked
//! across several.

use crate::error::PumsError;
use crate::fetch::metadata::MetadataFetcher;
use crate::fetch::transport::{HttpTransport, Transport};
use crate::frame::pums_frame::PumsFrame;
use crate::query::builder::{ValidatedQuery, DEFAULT_BASE_URL};
use crate::query::error::{QueryField, ValidationError};
use crate::response::error::SchemaError;
use crate::response::normalizer::normalize;
use crate::types::query::QuerySpec;
use crate::types::raw_response::RawResponse;
use bon::bon;
use log::{debug, info};
use std::time::Duration;

/// The client for the ACS 1-year PUMS endpoint.
///
/// Each call runs the whole pipeline synchronously: validate the query, fetch the
/// records, fetch the code tables the response needs, and normalize. Nothing is
/// cached between calls.
///
/// Create an instance with [`Pums::builder()`] for the public service, or with
/// [`Pums::with_transport()`] to bring your own HTTP stack.
///
/// # Examples
///
/// ```no_run
/// # use acs_pums::{Pums, PumsError};
/// # use std::time::Duration;
/// # fn main() -> Result<(), PumsError> {
/// // Defaults: the public Census endpoint, no timeout.
/// let pums = Pums::builder().build()?;
///
/// // Or bound every request.
/// let pums = Pums::builder().timeout(Duration::from_secs(60)).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pums<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
}

#[bon]
impl Pums<HttpTransport> {
    /// Creates a client that talks HTTP through a blocking `reqwest` client.
    ///
    /// # Arguments
    ///
    /// * `.base_url(impl Into<String>)`: Optional. Root of the data service. Defaults to `https://api.census.gov/data`.
    /// * `.timeout(Duration)`: Optional. Bound on each request. Defaults to no timeout.
    /// * `.user_agent(impl Into<String>)`: Optional. `User-Agent` header to send.
    ///
    /// # Errors
    ///
    /// Returns [`PumsError::ClientBuild`] if the HTTP client cannot be created.
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
        #[builder(into)] user_agent: Option<String>,
    ) -> Result<Self, PumsError> {
        let transport = HttpTransport::new(timeout, user_agent.as_deref())?;
        Ok(Self {
            transport,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

#[bon]
impl<T: Transport> Pums<T> {
    /// Creates a client on top of any [`Transport`], pointed at the public service.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at another root URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches one survey year of a numeric variable against a categorical variable.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.year(i32)`: **Required.** Survey year, 2010 to 2022 except 2020.
    /// * `.numeric(&str)`: **Required.** One of `AGEP`, `JWAP`, `JWDP`, `JWMNP`, `WAGP`, `WKHP`.
    /// * `.categorical(&str)`: **Required.** One of `SEX`, `FER`, `HHT`, `HUGCL`, `HUPAC`, `JWTRNS`, `LNGI`.
    /// * `.location_type(&str)`: Optional. `ALL` (default), `REGION`, `DIVISION` or `STATE`.
    /// * `.location_code(&str)`: Optional. Geography code, required unless the scope is `ALL`.
    ///
    /// # Errors
    ///
    /// Returns [`PumsError::Validation`] before any request if a parameter is not legal,
    /// [`PumsError::NetworkRequest`] / [`PumsError::HttpStatus`] if a request fails, and
    /// [`PumsError::Parse`], [`PumsError::Schema`] or [`PumsError::Domain`] if the
    /// response cannot be normalized.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use acs_pums::{Pums, PumsError};
    /// # fn main() -> Result<(), PumsError> {
    /// let pums = Pums::builder().build()?;
    ///
    /// // Age by sex in Iowa.
    /// let ages = pums
    ///     .fetch()
    ///     .year(2022)
    ///     .numeric("AGEP")
    ///     .categorical("SEX")
    ///     .location_type("STATE")
    ///     .location_code("19")
    ///     .call()?;
    /// println!("{}", ages.frame().head(Some(5)));
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn fetch(
        &self,
        year: i32,
        numeric: &str,
        categorical: &str,
        location_type: Option<&str>,
        location_code: Option<&str>,
    ) -> Result<PumsFrame, PumsError> {
        let spec = spec(year, numeric, categorical, location_type, location_code);
        self.run(&spec)
    }

    /// Fetches several survey years and stacks them in the order given, with a
    /// trailing `year` column.
    ///
    /// Years are fetched one after another. Every year is validated before the
    /// first request is sent.
    ///
    /// # Arguments
    ///
    /// * `.years(&[i32])`: **Required.** At least one survey year.
    /// * Otherwise the same as [`Pums::fetch`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use acs_pums::{Pums, PumsError};
    /// # fn main() -> Result<(), PumsError> {
    /// let pums = Pums::builder().build()?;
    /// let arrivals = pums
    ///     .fetch_years()
    ///     .years(&[2022, 2021, 2019])
    ///     .numeric("JWAP")
    ///     .categorical("JWTRNS")
    ///     .call()?;
    /// println!("{} records", arrivals.height());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn fetch_years(
        &self,
        years: &[i32],
        numeric: &str,
        categorical: &str,
        location_type: Option<&str>,
        location_code: Option<&str>,
    ) -> Result<PumsFrame, PumsError> {
        if years.is_empty() {
            return Err(ValidationError::new(
                QueryField::Year,
                "[]",
                "at least one survey year is required",
            )
            .into());
        }

        let specs: Vec<QuerySpec> = years
            .iter()
            .map(|year| spec(*year, numeric, categorical, location_type, location_code))
            .collect();
        for spec in &specs {
            ValidatedQuery::new(spec)?;
        }

        let mut frames = Vec::with_capacity(specs.len());
        for spec in &specs {
            debug!("Fetching year {} of {}", spec.year, years.len());
            frames.push(self.run(spec)?.with_year(spec.year)?);
        }
        PumsFrame::stack(frames)
    }

    /// Runs the pipeline for one query specification.
    pub fn run(&self, spec: &QuerySpec) -> Result<PumsFrame, PumsError> {
        let query = ValidatedQuery::new(spec)?;
        let url = query.url(&self.base_url);
        info!(
            "Fetching {} by {} for {}",
            query.numeric_var, query.categorical_var, query.year
        );

        let body = self.transport.get(&url)?;
        let raw = RawResponse::from_json(&body)?;
        check_header(&query, &raw)?;

        let metadata = MetadataFetcher::new(&self.transport, &self.base_url, query.year);
        normalize(raw, &metadata)
    }
}

fn spec(
    year: i32,
    numeric: &str,
    categorical: &str,
    location_type: Option<&str>,
    location_code: Option<&str>,
) -> QuerySpec {
    QuerySpec::builder()
        .year(year)
        .numeric_var(numeric)
        .categorical_var(categorical)
        .maybe_location_type(location_type)
        .maybe_location_code(location_code)
        .build()
}

/// The service echoes requested variables in request order; anything else means
/// the positional roles would be wrong.
fn check_header(query: &ValidatedQuery, raw: &RawResponse) -> Result<(), SchemaError> {
    let Some(header) = raw.header() else {
        return Ok(());
    };
    for (position, expected) in query.variables().iter().enumerate() {
        if let Some(found) = header.get(position) {
            if found != expected {
                return Err(SchemaError::HeaderMismatch {
                    position: position + 1,
                    expected: expected.to_string(),
                    found: found.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::summary::Summarizable;
    use crate::test_support::{hht_metadata, jwap_metadata, sex_metadata, StubTransport, BASE_URL};

    fn query_url(year: i32, get: &str) -> String {
        format!("{BASE_URL}/{year}/acs/acs1/pums?get={get}")
    }

    fn client(transport: StubTransport) -> Pums<StubTransport> {
        Pums::with_transport(transport).with_base_url(BASE_URL)
    }

    #[test]
    fn test_state_query_end_to_end() -> Result<(), PumsError> {
        let url = format!("{}&for=state:19", query_url(2022, "AGEP,SEX,PWGTP"));
        let transport = StubTransport::new()
            .with_rows(
                url.as_str(),
                &[
                    &["AGEP", "SEX", "PWGTP", "state"],
                    &["34", "1", "87", "19"],
                    &["61", "2", "140", "19"],
                ],
            )
            .with_metadata(2022, "SEX", sex_metadata());
        let pums = client(transport);

        let frame = pums
            .fetch()
            .year(2022)
            .numeric("AGEP")
            .categorical("SEX")
            .location_type("STATE")
            .location_code("19")
            .call()?;

        assert_eq!(frame.numeric_values()?, vec![34.0, 61.0]);
        assert_eq!(frame.labels()?, vec!["Male", "Female"]);
        assert_eq!(frame.weights()?, vec![87.0, 140.0]);
        assert_eq!(frame.roles().geography, vec!["state"]);
        assert_eq!(
            pums.transport().requests(),
            vec![url, format!("{BASE_URL}/2022/acs/acs1/pums/variables/SEX.json")]
        );
        Ok(())
    }

    #[test]
    fn test_arrival_times_fetch_both_tables() -> Result<(), PumsError> {
        let transport = StubTransport::new()
            .with_rows(
                query_url(2019, "JWAP,HHT,PWGTP"),
                &[
                    &["JWAP", "HHT", "PWGTP"],
                    &["0", "0", "20"],
                    &["103", "1", "15"],
                ],
            )
            .with_metadata(2019, "JWAP", jwap_metadata())
            .with_metadata(2019, "HHT", hht_metadata());
        let pums = client(transport);

        let frame = pums.fetch().year(2019).numeric("JWAP").categorical("HHT").call()?;

        // 103 covers 8:30 a.m. to 8:34 a.m.
        assert_eq!(frame.numeric_values()?, vec![0.0, 512.0]);
        assert_eq!(frame.labels()?[1], "Married couple household");
        assert_eq!(pums.transport().requests().len(), 3);
        Ok(())
    }

    #[test]
    fn test_invalid_query_sends_nothing() {
        let pums = client(StubTransport::new());
        let err = pums
            .fetch()
            .year(2020)
            .numeric("AGEP")
            .categorical("SEX")
            .call()
            .unwrap_err();
        assert!(matches!(err, PumsError::Validation(ValidationError { field: QueryField::Year, .. })));

        let err = pums
            .fetch()
            .year(2022)
            .numeric("AGEP")
            .categorical("SEX")
            .location_type("COUNTY")
            .location_code("19")
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            PumsError::Validation(ValidationError { field: QueryField::LocationType, .. })
        ));
        assert!(pums.transport().requests().is_empty());
    }

    #[test]
    fn test_unexpected_header_is_rejected() {
        let transport = StubTransport::new().with_rows(
            query_url(2022, "AGEP,SEX,PWGTP"),
            &[&["SEX", "AGEP", "PWGTP"], &["1", "34", "87"]],
        );
        let pums = client(transport);
        let err = pums
            .fetch()
            .year(2022)
            .numeric("AGEP")
            .categorical("SEX")
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            PumsError::Schema(SchemaError::HeaderMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let transport =
            StubTransport::new().with(query_url(2022, "AGEP,SEX,PWGTP"), "error: unknown variable");
        let err = client(transport)
            .fetch()
            .year(2022)
            .numeric("AGEP")
            .categorical("SEX")
            .call()
            .unwrap_err();
        assert!(matches!(err, PumsError::Parse(_)));
    }

    #[test]
    fn test_years_are_stacked_in_order() -> Result<(), PumsError> {
        let transport = StubTransport::new()
            .with_rows(
                query_url(2022, "AGEP,SEX,PWGTP"),
                &[&["AGEP", "SEX", "PWGTP"], &["34", "1", "87"], &["35", "2", "80"]],
            )
            .with_rows(
                query_url(2021, "AGEP,SEX,PWGTP"),
                &[&["AGEP", "SEX", "PWGTP"], &["50", "2", "10"]],
            )
            .with_metadata(2022, "SEX", sex_metadata())
            .with_metadata(2021, "SEX", sex_metadata());
        let pums = client(transport);

        let frame = pums
            .fetch_years()
            .years(&[2022, 2021])
            .numeric("AGEP")
            .categorical("SEX")
            .call()?;

        assert_eq!(frame.height(), 3);
        let years = frame.years()?.unwrap_or_default();
        assert_eq!(years, vec![2022, 2022, 2021]);
        let mut distinct = years.clone();
        distinct.dedup();
        assert_eq!(distinct, vec![2022, 2021]);
        assert_eq!(frame.roles().names(), vec!["AGEP", "SEX", "PWGTP", "year"]);

        let summary = frame.summary()?;
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].year, Some(2022));
        Ok(())
    }

    #[test]
    fn test_years_are_all_validated_first() {
        let pums = client(StubTransport::new());
        let err = pums
            .fetch_years()
            .years(&[2022, 2020])
            .numeric("AGEP")
            .categorical("SEX")
            .call()
            .unwrap_err();
        assert!(matches!(err, PumsError::Validation(_)));
        assert!(pums.transport().requests().is_empty());

        let err = pums
            .fetch_years()
            .years(&[])
            .numeric("AGEP")
            .categorical("SEX")
            .call()
            .unwrap_err();
        assert!(matches!(err, PumsError::Validation(ValidationError { field: QueryField::Year, .. })));
    }

    #[test]
    fn test_default_client() {
        let pums = Pums::builder().build().unwrap();
        assert_eq!(pums.base_url(), "https://api.census.gov/data");
        let pums = Pums::builder()
            .base_url("http://localhost:9999/data")
            .timeout(Duration::from_secs(1))
            .user_agent("tests")
            .build()
            .unwrap();
        assert_eq!(pums.base_url(), "http://localhost:9999/data");
    }

    #[test]
    #[ignore = "requires network access to api.census.gov"]
    fn test_live_age_by_sex_in_iowa() -> Result<(), PumsError> {
        let pums = Pums::builder().timeout(Duration::from_secs(120)).build()?;
        let frame = pums
            .fetch()
            .year(2022)
            .numeric("AGEP")
            .categorical("SEX")
            .location_type("STATE")
            .location_code("19")
            .call()?;
        assert!(frame.height() > 10_000);
        assert_eq!(frame.categories()?.len(), 2);
        Ok(())
    }
}
