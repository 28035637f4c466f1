//! The fixed catalog of variables and location scopes that a PUMS query may name.
//!
//! Queries are validated against this catalog before any request is sent. The
//! catalog also records the two service conventions the normalizer depends on:
//! which numeric variables are interval-coded clock times, and which code a
//! categorical variable's table starts at.

use std::fmt;
use std::str::FromStr;

/// Name of the person weight column. Always requested, never user-selectable.
pub const WEIGHT_VARIABLE: &str = "PWGTP";

/// Whether a catalog variable is read as a number or decoded to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Numeric,
    Categorical,
}

/// A single entry in the variable catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub kind: VariableKind,
    /// Human-readable description, as shown by the data service.
    pub description: &'static str,
    /// Set for numeric variables whose values are interval codes for a time of day.
    pub interval_coded: bool,
    /// First code of a categorical variable's table. Only `SEX` starts at 1.
    pub first_code: u32,
}

const fn numeric(name: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        kind: VariableKind::Numeric,
        description,
        interval_coded: false,
        first_code: 0,
    }
}

const fn clock_time(name: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry {
        name,
        kind: VariableKind::Numeric,
        description,
        interval_coded: true,
        first_code: 0,
    }
}

const fn categorical(name: &'static str, description: &'static str, first_code: u32) -> CatalogEntry {
    CatalogEntry {
        name,
        kind: VariableKind::Categorical,
        description,
        interval_coded: false,
        first_code,
    }
}

/// Every variable a query may request, numeric ones first.
pub const CATALOG: [CatalogEntry; 13] = [
    numeric("AGEP", "Age"),
    clock_time("JWAP", "Time of arrival at work"),
    clock_time("JWDP", "Time of departure for work"),
    numeric("JWMNP", "Travel time to work"),
    numeric("WAGP", "Wages or salary income past 12 months"),
    numeric("WKHP", "Usual hours worked per week past 12 months"),
    categorical("SEX", "Sex", 1),
    categorical("FER", "Gave birth to child within the past 12 months", 0),
    categorical("HHT", "Household/family type", 0),
    categorical("HUGCL", "Household with grandparent living with grandchildren", 0),
    categorical("HUPAC", "HH presence and age of children", 0),
    categorical("JWTRNS", "Means of transportation to work", 0),
    categorical("LNGI", "Limited English speaking household", 0),
];

/// Looks up a catalog entry by its exact (upper-case) name.
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

/// Looks up a numeric variable.
pub fn numeric_variable(name: &str) -> Option<&'static CatalogEntry> {
    lookup(name).filter(|entry| entry.kind == VariableKind::Numeric)
}

/// Looks up a categorical variable.
pub fn categorical_variable(name: &str) -> Option<&'static CatalogEntry> {
    lookup(name).filter(|entry| entry.kind == VariableKind::Categorical)
}

/// Returns `true` if `name` is a numeric variable whose values are clock-time interval codes.
pub fn is_interval_coded(name: &str) -> bool {
    numeric_variable(name).is_some_and(|entry| entry.interval_coded)
}

pub fn numeric_names() -> Vec<&'static str> {
    names_of(VariableKind::Numeric)
}

pub fn categorical_names() -> Vec<&'static str> {
    names_of(VariableKind::Categorical)
}

fn names_of(kind: VariableKind) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.name)
        .collect()
}

/// Earliest survey year served by the ACS 1-year PUMS endpoint.
pub const FIRST_YEAR: i32 = 2010;
/// Latest survey year served by the ACS 1-year PUMS endpoint.
pub const LAST_YEAR: i32 = 2022;
/// The 2020 1-year release was never published.
pub const MISSING_YEAR: i32 = 2020;

/// Returns `true` for years the service publishes 1-year PUMS data for.
pub fn is_supported_year(year: i32) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year) && year != MISSING_YEAR
}

/// All supported survey years in ascending order.
pub fn supported_years() -> Vec<i32> {
    (FIRST_YEAR..=LAST_YEAR).filter(|year| *year != MISSING_YEAR).collect()
}

/// The geographic level a query result is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    /// Nationwide, no geography clause.
    All,
    Region,
    Division,
    State,
}

impl LocationType {
    pub const ALL_VALUES: [LocationType; 4] = [
        LocationType::All,
        LocationType::Region,
        LocationType::Division,
        LocationType::State,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::All => "ALL",
            LocationType::Region => "REGION",
            LocationType::Division => "DIVISION",
            LocationType::State => "STATE",
        }
    }

    /// The predicate name used in the `for=` clause of a query URL.
    pub(crate) fn url_segment(&self) -> Option<&'static str> {
        match self {
            LocationType::All => None,
            LocationType::Region => Some("region"),
            LocationType::Division => Some("division"),
            LocationType::State => Some("state"),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string is not one of the four location scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocationType(pub String);

impl FromStr for LocationType {
    type Err = UnknownLocationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationType::ALL_VALUES
            .into_iter()
            .find(|location| location.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLocationType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_six_numeric_and_seven_categorical() {
        assert_eq!(numeric_names().len(), 6);
        assert_eq!(categorical_names().len(), 7);
        assert!(!numeric_names().contains(&WEIGHT_VARIABLE));
    }

    #[test]
    fn test_only_sex_starts_at_one() {
        for entry in CATALOG.iter().filter(|e| e.kind == VariableKind::Categorical) {
            let expected = if entry.name == "SEX" { 1 } else { 0 };
            assert_eq!(entry.first_code, expected, "{}", entry.name);
        }
    }

    #[test]
    fn test_interval_coded_variables() {
        assert!(is_interval_coded("JWAP"));
        assert!(is_interval_coded("JWDP"));
        assert!(!is_interval_coded("AGEP"));
        assert!(!is_interval_coded("SEX"));
        assert!(!is_interval_coded("NOPE"));
    }

    #[test]
    fn test_kind_lookups_do_not_cross() {
        assert!(numeric_variable("SEX").is_none());
        assert!(categorical_variable("AGEP").is_none());
        assert_eq!(categorical_variable("HHT").map(|e| e.name), Some("HHT"));
    }

    #[test]
    fn test_supported_years() {
        let years = supported_years();
        assert_eq!(years.len(), 12);
        assert!(!years.contains(&2020));
        assert!(is_supported_year(2010));
        assert!(is_supported_year(2022));
        assert!(!is_supported_year(2009));
        assert!(!is_supported_year(2023));
    }

    #[test]
    fn test_location_type_parsing() {
        assert_eq!("STATE".parse::<LocationType>(), Ok(LocationType::State));
        assert_eq!("division".parse::<LocationType>(), Ok(LocationType::Division));
        assert_eq!(" All ".parse::<LocationType>(), Ok(LocationType::All));
        assert_eq!(
            "COUNTY".parse::<LocationType>(),
            Err(UnknownLocationType("COUNTY".to_string()))
        );
        assert_eq!(LocationType::Region.to_string(), "REGION");
        assert_eq!(LocationType::All.url_segment(), None);
    }
}
