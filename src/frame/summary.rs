//! Weighted descriptive statistics for a [`PumsFrame`].

use crate::error::PumsError;
use crate::frame::pums_frame::PumsFrame;
use ordered_float::OrderedFloat;
use polars::prelude::*;

/// Weighted statistics of the numeric column over one group of records.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Categorical label of the group, `None` for the whole table.
    pub label: Option<String>,
    /// Survey year of the group when the frame spans several years.
    pub year: Option<i32>,
    /// Number of sample records.
    pub n: usize,
    pub weight_total: f64,
    /// `Σ w·x / Σ w`
    pub weighted_mean: f64,
    /// `Σ w·(x − mean)² / Σ w`
    pub weighted_var: f64,
    pub weighted_sd: f64,
}

/// Five-number summary of the numeric column over one group, as drawn in a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub year: Option<i32>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Domain-specific summaries of a normalized table.
pub trait Summarizable {
    /// Weighted statistics per categorical label (and year, when present), in
    /// order of first appearance.
    fn summary(&self) -> Result<Vec<GroupSummary>, PumsError>;

    /// Weighted statistics over every record.
    fn overall(&self) -> Result<GroupSummary, PumsError>;

    /// Unweighted five-number summaries per categorical label (and year).
    fn box_stats(&self) -> Result<Vec<BoxStats>, PumsError>;

    /// [`Summarizable::summary`] as a `DataFrame`.
    fn summary_frame(&self) -> Result<DataFrame, PumsError> {
        summaries_to_frame(&self.summary()?)
    }
}

struct Record {
    year: Option<i32>,
    label: String,
    value: f64,
    weight: f64,
}

fn records(frame: &PumsFrame) -> Result<Vec<Record>, PumsError> {
    let values = frame.numeric_values()?;
    let weights = frame.weights()?;
    let labels = frame.labels()?;
    let years = frame.years()?;

    Ok(labels
        .into_iter()
        .zip(values)
        .zip(weights)
        .enumerate()
        .map(|(i, ((label, value), weight))| Record {
            year: years.as_ref().map(|years| years[i]),
            label,
            value,
            weight,
        })
        .collect())
}

/// Groups records by `(year, label)` keeping first-appearance order.
fn grouped(records: Vec<Record>) -> Vec<((Option<i32>, String), Vec<Record>)> {
    let mut groups: Vec<((Option<i32>, String), Vec<Record>)> = Vec::new();
    for record in records {
        let key = (record.year, record.label.clone());
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}

fn weighted(label: Option<String>, year: Option<i32>, records: &[Record]) -> GroupSummary {
    let weight_total: f64 = records.iter().map(|r| r.weight).sum();
    let weighted_mean = records.iter().map(|r| r.weight * r.value).sum::<f64>() / weight_total;
    let weighted_var = records
        .iter()
        .map(|r| r.weight * (r.value - weighted_mean).powi(2))
        .sum::<f64>()
        / weight_total;
    GroupSummary {
        label,
        year,
        n: records.len(),
        weight_total,
        weighted_mean,
        weighted_var,
        weighted_sd: weighted_var.sqrt(),
    }
}

/// Linear interpolation between order statistics of an ascending slice.
fn quantile(sorted: &[OrderedFloat<f64>], p: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower].0 + fraction * (sorted[upper].0 - sorted[lower].0)
}

fn five_numbers(label: String, year: Option<i32>, records: &[Record]) -> BoxStats {
    let mut sorted: Vec<OrderedFloat<f64>> = records.iter().map(|r| OrderedFloat(r.value)).collect();
    sorted.sort();
    BoxStats {
        label,
        year,
        min: quantile(&sorted, 0.0),
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: quantile(&sorted, 1.0),
    }
}

impl Summarizable for PumsFrame {
    fn summary(&self) -> Result<Vec<GroupSummary>, PumsError> {
        Ok(grouped(records(self)?)
            .into_iter()
            .map(|((year, label), members)| weighted(Some(label), year, &members))
            .collect())
    }

    fn overall(&self) -> Result<GroupSummary, PumsError> {
        Ok(weighted(None, None, &records(self)?))
    }

    fn box_stats(&self) -> Result<Vec<BoxStats>, PumsError> {
        Ok(grouped(records(self)?)
            .into_iter()
            .map(|((year, label), members)| five_numbers(label, year, &members))
            .collect())
    }
}

fn summaries_to_frame(summaries: &[GroupSummary]) -> Result<DataFrame, PumsError> {
    let labels: Vec<Option<&str>> = summaries.iter().map(|s| s.label.as_deref()).collect();
    let years: Vec<Option<i32>> = summaries.iter().map(|s| s.year).collect();
    let counts: Vec<u64> = summaries.iter().map(|s| s.n as u64).collect();
    let float = |f: fn(&GroupSummary) -> f64| summaries.iter().map(f).collect::<Vec<f64>>();

    let mut columns = vec![Column::from(Series::new("label".into(), labels))];
    if years.iter().any(Option::is_some) {
        columns.push(Column::from(Series::new("year".into(), years)));
    }
    columns.extend([
        Column::from(Series::new("n".into(), counts)),
        Column::from(Series::new("weight_total".into(), float(|s| s.weight_total))),
        Column::from(Series::new("weighted_mean".into(), float(|s| s.weighted_mean))),
        Column::from(Series::new("weighted_var".into(), float(|s| s.weighted_var))),
        Column::from(Series::new("weighted_sd".into(), float(|s| s.weighted_sd))),
    ]);
    Ok(DataFrame::new(columns)?)
}
