//! Service metadata mapping a variable's integer codes to labels.

use crate::response::error::ParseError;
use std::collections::BTreeMap;

/// The code-to-label table of one variable, ordered by ascending numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    variable: String,
    entries: BTreeMap<u32, String>,
}

impl CodeTable {
    pub fn new(variable: impl Into<String>, entries: BTreeMap<u32, String>) -> Self {
        Self {
            variable: variable.into(),
            entries,
        }
    }

    /// Builds a table from string keys as the service sends them (`"0"`, `"01"`, `"285"`).
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::CodeKey`] if a key is not a non-negative integer.
    pub fn from_string_codes<K, V, I>(variable: impl Into<String>, pairs: I) -> Result<Self, ParseError>
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let variable = variable.into();
        let mut entries = BTreeMap::new();
        for (key, label) in pairs {
            let key = key.as_ref();
            let code = key.trim().parse::<u32>().map_err(|_| ParseError::CodeKey {
                variable: variable.clone(),
                code: key.to_string(),
            })?;
            entries.insert(code, label.into());
        }
        Ok(Self { variable, entries })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.entries.get(&code).map(String::as_str)
    }

    /// Entries in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(code, label)| (*code, label.as_str()))
    }

    /// Labels in ascending code order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    /// Reverse lookup of the code a label is stored under.
    pub fn code_for_label(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.as_str() == label)
            .map(|(code, _)| *code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_ordered_numerically() {
        let table = CodeTable::from_string_codes(
            "HHT",
            [("10", "ten"), ("2", "two"), ("01", "one"), ("0", "zero")],
        )
        .unwrap();
        let codes: Vec<u32> = table.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![0, 1, 2, 10]);
        assert_eq!(table.labels(), vec!["zero", "one", "two", "ten"]);
        assert_eq!(table.get(1), Some("one"));
        assert_eq!(table.code_for_label("ten"), Some(10));
        assert_eq!(table.code_for_label("eleven"), None);
    }

    #[test]
    fn test_non_integer_key_is_rejected() {
        let err = CodeTable::from_string_codes("FER", [("0", "N/A"), ("b", "blank")]).unwrap_err();
        match err {
            ParseError::CodeKey { variable, code } => {
                assert_eq!(variable, "FER");
                assert_eq!(code, "b");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
