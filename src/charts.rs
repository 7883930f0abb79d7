//! Data series behind the dashboard charts: the grouped bar chart of
//! severities per occupation, the age box plot per severity and the
//! treatment heatmap averaged per state, age band or sex.

use serde::Serialize;

use crate::models::{Record, Severity, TreatmentRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationSeverity {
    pub occupation: String,
    /// Always four entries, in `Severity::ALL` order.
    pub counts: Vec<(Severity, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityAges {
    pub severity: Severity,
    pub stats: Option<BoxStats>,
}

pub fn severity_by_occupation(records: &[Record]) -> Vec<OccupationSeverity> {
    let mut rows: Vec<OccupationSeverity> = Vec::new();

    for record in records {
        let slot = match rows.iter().position(|row| row.occupation == record.occupation) {
            Some(slot) => slot,
            None => {
                rows.push(OccupationSeverity {
                    occupation: record.occupation.clone(),
                    counts: Severity::ALL.iter().map(|&s| (s, 0)).collect(),
                });
                rows.len() - 1
            }
        };
        if let Some(entry) = rows[slot]
            .counts
            .iter_mut()
            .find(|(severity, _)| *severity == record.severity)
        {
            entry.1 += 1;
        }
    }

    rows
}

pub fn age_box_stats(records: &[Record]) -> Vec<SeverityAges> {
    Severity::ALL
        .iter()
        .map(|&severity| {
            let mut ages: Vec<f64> = records
                .iter()
                .filter(|record| record.severity == severity)
                .map(|record| f64::from(record.age))
                .collect();
            ages.sort_by(|a, b| a.total_cmp(b));
            SeverityAges {
                severity,
                stats: box_stats(&ages),
            }
        })
        .collect()
}

/// `sorted` must be ascending. Quartiles are rounded to whole values and the
/// whiskers are clamped to 1.5 IQR.
pub fn box_stats(sorted: &[f64]) -> Option<BoxStats> {
    let (&lowest, &highest) = (sorted.first()?, sorted.last()?);
    let q1 = quantile(sorted, 0.25)?.round();
    let median = quantile(sorted, 0.5)?.round();
    let q3 = quantile(sorted, 0.75)?.round();
    let iqr = q3 - q1;

    Some(BoxStats {
        min: lowest.max(q1 - 1.5 * iqr),
        q1,
        median,
        q3,
        max: highest.min(q3 + 1.5 * iqr),
    })
}

/// Linear interpolation between the order statistics around `(n - 1) * p`.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = last as f64 * p.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Breakdown of the weekly treatment survey, named by its `Group` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreatmentDimension {
    Age,
    Sex,
    State,
}

impl TreatmentDimension {
    pub const ALL: [TreatmentDimension; 3] = [
        TreatmentDimension::Age,
        TreatmentDimension::Sex,
        TreatmentDimension::State,
    ];

    pub fn group_label(&self) -> &'static str {
        match self {
            TreatmentDimension::Age => "By Age",
            TreatmentDimension::Sex => "By Sex",
            TreatmentDimension::State => "By State",
        }
    }

    fn label<'a>(&self, row: &'a TreatmentRow) -> &'a str {
        match self {
            TreatmentDimension::State => &row.state,
            TreatmentDimension::Age | TreatmentDimension::Sex => &row.subgroup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentAverage {
    pub label: String,
    pub mean: f64,
    /// Number of non-blank estimates behind `mean`.
    pub samples: usize,
}

/// Mean estimate per label of one dimension, in first-seen order. Rows with
/// a blank value are skipped, so every label has at least one sample.
pub fn treatment_averages(
    rows: &[TreatmentRow],
    dimension: TreatmentDimension,
) -> Vec<TreatmentAverage> {
    let mut sums: Vec<(String, f64, usize)> = Vec::new();

    for row in rows.iter().filter(|row| row.group == dimension.group_label()) {
        let Some(value) = row.value else { continue };
        let label = dimension.label(row);
        match sums.iter_mut().find(|(existing, _, _)| existing == label) {
            Some(entry) => {
                entry.1 += value;
                entry.2 += 1;
            }
            None => sums.push((label.to_string(), value, 1)),
        }
    }

    sums.into_iter()
        .map(|(label, total, samples)| TreatmentAverage {
            label,
            mean: total / samples as f64,
            samples,
        })
        .collect()
}
