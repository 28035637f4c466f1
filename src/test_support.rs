//! Offline fixtures: a canned-response transport and code tables shaped like the
//! service metadata.

use crate::error::PumsError;
use crate::fetch::transport::Transport;
use crate::query::builder::metadata_url;
use crate::types::code_table::CodeTable;
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;

pub(crate) const BASE_URL: &str = "http://census.test/data";

/// Serves fixed bodies by URL and records every request in order.
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }

    pub(crate) fn with_metadata(self, year: i32, variable: &str, metadata: Value) -> Self {
        let url = metadata_url(BASE_URL, year, variable);
        self.with(url, metadata.to_string())
    }

    pub(crate) fn with_rows(self, url: impl Into<String>, rows: &[&[&str]]) -> Self {
        self.with(url, json!(rows).to_string())
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, PumsError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.bodies.get(url) {
            Some(body) => Ok(body.clone()),
            None => panic!("unexpected request to {url}"),
        }
    }
}

fn metadata(name: &str, label: &str, items: Map<String, Value>) -> Value {
    json!({
        "name": name,
        "label": label,
        "predicateType": "int",
        "group": "N/A",
        "limit": 0,
        "suggested-weight": "PWGTP",
        "values": { "item": items }
    })
}

fn items(pairs: impl IntoIterator<Item = (String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(code, label)| (code, Value::String(label)))
        .collect()
}

pub(crate) fn sex_metadata() -> Value {
    metadata(
        "SEX",
        "Sex",
        items([("1".to_string(), "Male".to_string()), ("2".to_string(), "Female".to_string())]),
    )
}

const HHT_LABELS: [&str; 8] = [
    "N/A (GQ/vacant)",
    "Married couple household",
    "Other family household: Male householder, no spouse present",
    "Other family household: Female householder, no spouse present",
    "Nonfamily household: Male householder: Living alone",
    "Nonfamily household: Male householder: Not living alone",
    "Nonfamily household: Female householder: Living alone",
    "Nonfamily household: Female householder: Not living alone",
];

pub(crate) fn hht_metadata() -> Value {
    metadata(
        "HHT",
        "Household/family type",
        items(
            HHT_LABELS
                .iter()
                .enumerate()
                .map(|(code, label)| (code.to_string(), label.to_string())),
        ),
    )
}

/// `12:05 a.m.` style clock for a minute of the day.
pub(crate) fn clock(minute: u32) -> String {
    let (hour, minute) = (minute / 60, minute % 60);
    let (hour, marker) = match hour {
        0 => (12, "a.m."),
        1..=11 => (hour, "a.m."),
        12 => (12, "p.m."),
        _ => (hour - 12, "p.m."),
    };
    format!("{hour}:{minute:02} {marker}")
}

pub(crate) fn clock_label(start: u32, end: u32) -> String {
    format!("{} to {}", clock(start), clock(end))
}

/// Codes `1..=count` as contiguous five-minute brackets from midnight, plus code 0.
/// Codes are zero-padded to three digits the way the service sends them.
pub(crate) fn five_minute_bracket_items(count: u32) -> Vec<(String, String)> {
    std::iter::once((
        "0".to_string(),
        "N/A (not a worker; worker who worked from home)".to_string(),
    ))
    .chain((1..=count).map(|code| {
        let start = (code - 1) * 5;
        (format!("{code:03}"), clock_label(start, start + 4))
    }))
    .collect()
}

pub(crate) fn five_minute_brackets(variable: &str, count: u32) -> CodeTable {
    CodeTable::from_string_codes(variable, five_minute_bracket_items(count))
        .expect("fixture codes are integers")
}

pub(crate) fn jwap_metadata() -> Value {
    metadata(
        "JWAP",
        "Time of arrival at work - hour and minute",
        items(five_minute_bracket_items(288)),
    )
}

pub(crate) fn sex_table() -> CodeTable {
    CodeTable::from_string_codes("SEX", [("1", "Male"), ("2", "Female")]).expect("fixture")
}

pub(crate) fn hht_table() -> CodeTable {
    CodeTable::from_string_codes(
        "HHT",
        HHT_LABELS
            .iter()
            .enumerate()
            .map(|(code, label)| (code.to_string(), *label)),
    )
    .expect("fixture")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_formatting() {
        assert_eq!(clock(0), "12:00 a.m.");
        assert_eq!(clock(65), "1:05 a.m.");
        assert_eq!(clock(720), "12:00 p.m.");
        assert_eq!(clock(1439), "11:59 p.m.");
    }
}
