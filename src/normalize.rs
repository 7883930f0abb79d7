use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Record, Severity, StressLevel};

/// One row as read from the delimited source, keyed by header name.
pub type RawRow = HashMap<String, String>;

pub const USER_ID: &str = "User_ID";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const OCCUPATION: &str = "Occupation";
pub const COUNTRY: &str = "Country";
pub const CONDITION: &str = "Mental_Health_Condition";
pub const SEVERITY: &str = "Severity";
pub const CONSULTATION: &str = "Consultation_History";
pub const STRESS_LEVEL: &str = "Stress_Level";
pub const SLEEP_HOURS: &str = "Sleep_Hours";
pub const WORK_HOURS: &str = "Work_Hours";
pub const ACTIVITY_HOURS: &str = "Physical_Activity_Hours";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Zero-based position of the row in the input sequence.
    pub index: usize,
    pub reason: NormalizeError,
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

impl Normalized {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

pub fn normalize(rows: &[RawRow]) -> Normalized {
    let mut normalized = Normalized::default();

    for (index, row) in rows.iter().enumerate() {
        match normalize_row(row) {
            Ok(record) => normalized.records.push(record),
            Err(reason) => {
                debug!(index, %reason, "dropping row");
                normalized.skipped.push(SkippedRow { index, reason });
            }
        }
    }

    info!(
        kept = normalized.records.len(),
        skipped = normalized.skipped.len(),
        "normalized survey rows"
    );
    normalized
}

pub fn normalize_row(row: &RawRow) -> Result<Record, NormalizeError> {
    let age = required_number(row, AGE)?;
    if age < 0.0 {
        return Err(NormalizeError::InvalidNumber {
            field: AGE,
            value: text(row, AGE).to_string(),
        });
    }
    let work_hours = required_number(row, WORK_HOURS)?;
    let sleep_hours = required_number(row, SLEEP_HOURS)?;

    let physical_activity_hours = match text(row, ACTIVITY_HOURS).parse::<f64>() {
        Ok(hours) if hours.is_finite() => hours,
        _ => {
            debug!(
                id = text(row, USER_ID),
                value = text(row, ACTIVITY_HOURS),
                "activity hours unreadable, using 0"
            );
            0.0
        }
    };

    Ok(Record {
        id: text(row, USER_ID).to_string(),
        age: age.trunc() as u32,
        gender: text(row, GENDER).to_string(),
        occupation: text(row, OCCUPATION).to_string(),
        country: text(row, COUNTRY).to_string(),
        has_condition: flag(row, CONDITION),
        severity: Severity::parse(text(row, SEVERITY)),
        sought_consultation: flag(row, CONSULTATION),
        stress_level: StressLevel::parse(text(row, STRESS_LEVEL)),
        sleep_hours,
        work_hours,
        physical_activity_hours,
    })
}

fn text<'a>(row: &'a RawRow, field: &str) -> &'a str {
    row.get(field).map(|value| value.trim()).unwrap_or("")
}

fn flag(row: &RawRow, field: &str) -> bool {
    text(row, field).eq_ignore_ascii_case("yes")
}

fn required_number(row: &RawRow, field: &'static str) -> Result<f64, NormalizeError> {
    let value = text(row, field);
    if value.is_empty() {
        return Err(NormalizeError::MissingField { field });
    }
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(NormalizeError::InvalidNumber {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn complete_row() -> RawRow {
        raw_row(&[
            (USER_ID, "17"),
            (AGE, "42"),
            (GENDER, "Male"),
            (OCCUPATION, "Healthcare"),
            (COUNTRY, "India"),
            (CONDITION, "Yes"),
            (SEVERITY, "Medium"),
            (CONSULTATION, "No"),
            (STRESS_LEVEL, "High"),
            (SLEEP_HOURS, "5.5"),
            (WORK_HOURS, "58"),
            (ACTIVITY_HOURS, "3"),
        ])
    }

    #[test]
    fn complete_row_becomes_typed_record() {
        let record = normalize_row(&complete_row()).unwrap();
        assert_eq!(
            record,
            Record {
                id: "17".to_string(),
                age: 42,
                gender: "Male".to_string(),
                occupation: "Healthcare".to_string(),
                country: "India".to_string(),
                has_condition: true,
                severity: Severity::Medium,
                sought_consultation: false,
                stress_level: Some(StressLevel::High),
                sleep_hours: 5.5,
                work_hours: 58.0,
                physical_activity_hours: 3.0,
            }
        );
    }

    #[test]
    fn missing_required_numbers_are_rejected() {
        let mut row = complete_row();
        row.remove(WORK_HOURS);
        assert_eq!(
            normalize_row(&row),
            Err(NormalizeError::MissingField { field: WORK_HOURS })
        );

        let mut row = complete_row();
        row.insert(AGE.to_string(), "forty".to_string());
        assert_eq!(
            normalize_row(&row),
            Err(NormalizeError::InvalidNumber {
                field: AGE,
                value: "forty".to_string()
            })
        );

        let mut row = complete_row();
        row.insert(SLEEP_HOURS.to_string(), "NaN".to_string());
        assert!(normalize_row(&row).is_err());
    }

    #[test]
    fn optional_fields_fall_back() {
        let mut row = complete_row();
        row.remove(ACTIVITY_HOURS);
        row.insert(SEVERITY.to_string(), String::new());
        row.insert(STRESS_LEVEL.to_string(), "Unknown".to_string());
        let record = normalize_row(&row).unwrap();
        assert_eq!(record.physical_activity_hours, 0.0);
        assert_eq!(record.severity, Severity::None);
        assert_eq!(record.stress_level, None);
    }

    #[test]
    fn fractional_age_is_truncated() {
        let mut row = complete_row();
        row.insert(AGE.to_string(), " 29.9 ".to_string());
        assert_eq!(normalize_row(&row).unwrap().age, 29);
    }

    #[test]
    fn dropped_rows_are_counted_with_position() {
        let mut broken = complete_row();
        broken.insert(SLEEP_HOURS.to_string(), "lots".to_string());
        let rows = vec![complete_row(), broken, complete_row()];

        let normalized = normalize(&rows);
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.skipped_count(), 1);
        assert_eq!(normalized.skipped[0].index, 1);
        assert_eq!(
            normalized.skipped[0].reason.to_string(),
            "field 'Sleep_Hours' is not a valid number: 'lots'"
        );
    }
}
