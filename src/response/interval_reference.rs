//! Converts clock-time interval codes into minutes after midnight.
//!
//! Interval-coded variables such as `JWAP` report a bracket like
//! `"7:30 a.m. to 7:34 a.m."` instead of a time. The reference built here maps
//! every bracket code to the minute-offset-from-midnight of its midpoint so the
//! column can be treated as a continuous number.
//!
//! Offsets are accumulated from interval lengths rather than read off the start
//! times: interval `i + 1` starts one minute after interval `i` ends, matching the
//! `"… to 7:34"` / `"7:35 to …"` labelling of the service. Code `0` means "not
//! applicable" and never enters the reference.

use crate::response::error::{DomainError, ParseError};
use crate::types::code_table::CodeTable;
use chrono::NaiveTime;
use std::collections::BTreeMap;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Code reserved for "not applicable / not reported".
pub const NOT_APPLICABLE_CODE: u32 = 0;

/// One parsed bracket of an interval-coded variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub code: u32,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// `end - start` in minutes.
    pub length: f64,
    /// Minutes from midnight to the start of the interval.
    pub start_offset: f64,
    /// `start_offset + length / 2`, the value stored in the reference.
    pub midpoint: f64,
}

/// Ordered mapping from interval code to the minute-offset of the interval's midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalReference {
    variable: String,
    intervals: Vec<Interval>,
    midpoints: BTreeMap<u32, f64>,
}

impl IntervalReference {
    /// Builds the reference from a variable's code table.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::IntervalLabel`] for the first label (other than code 0)
    /// that does not contain exactly two clock times.
    pub fn build(table: &CodeTable) -> Result<Self, ParseError> {
        let mut intervals = Vec::with_capacity(table.len());
        let mut next_start = 0.0;

        for (code, label) in table.iter().filter(|(code, _)| *code != NOT_APPLICABLE_CODE) {
            let (start, end) =
                parse_interval_label(label).ok_or_else(|| ParseError::IntervalLabel {
                    variable: table.variable().to_string(),
                    code,
                    label: label.to_string(),
                })?;

            let length = interval_minutes(start, end) as f64;
            let start_offset = next_start;
            next_start = start_offset + length + 1.0;

            intervals.push(Interval {
                code,
                start,
                end,
                length,
                start_offset,
                midpoint: start_offset + length / 2.0,
            });
        }

        let midpoints = intervals.iter().map(|i| (i.code, i.midpoint)).collect();
        Ok(Self {
            variable: table.variable().to_string(),
            intervals,
            midpoints,
        })
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Intervals in ascending code order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, code: u32) -> Option<f64> {
        self.midpoints.get(&code).copied()
    }

    /// Replaces a code value with its midpoint offset. `0` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IntervalCode`] if `value` is not a code in the reference.
    pub fn translate(&self, value: f64) -> Result<f64, DomainError> {
        if value == 0.0 {
            return Ok(value);
        }
        let code = (value > 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
            .then_some(value as u32);
        code.and_then(|code| self.get(code))
            .ok_or_else(|| DomainError::IntervalCode {
                variable: self.variable.clone(),
                code: value.to_string(),
            })
    }
}

/// Minutes from `start` to `end`, wrapping past midnight when `end` is earlier.
fn interval_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

fn meridiem(token: &str) -> Option<Meridiem> {
    let normalized: String = token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "am" => Some(Meridiem::Am),
        "pm" => Some(Meridiem::Pm),
        _ => None,
    }
}

fn is_clock(token: &str) -> bool {
    token.contains(':') && token.chars().all(|c| c.is_ascii_digit() || c == ':')
}

fn parse_clock(clock: &str, meridiem: Option<Meridiem>) -> Option<NaiveTime> {
    let (hour, minute) = clock.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    let hour = match meridiem {
        None => hour,
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Pulls the two clock times out of a label such as `"11:45 a.m. to 12:14 p.m."`.
///
/// Words that are not a clock time or an a.m./p.m. marker right after one are ignored.
fn parse_interval_label(label: &str) -> Option<(NaiveTime, NaiveTime)> {
    let mut times = Vec::with_capacity(2);
    let mut tokens = label
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')')))
        .peekable();

    while let Some(token) = tokens.next() {
        if !is_clock(token) {
            continue;
        }
        let marker = tokens.peek().and_then(|next| meridiem(next));
        if marker.is_some() {
            tokens.next();
        }
        times.push(parse_clock(token, marker)?);
    }

    match times.as_slice() {
        [start, end] => Some((*start, *end)),
        _ => None,
    }
}
