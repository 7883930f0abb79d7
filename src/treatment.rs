use serde::Serialize;

use crate::aggregate::{self, GroupSummaries};
use crate::models::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentGap {
    pub country: String,
    pub total: usize,
    pub with_condition: usize,
    pub gap: usize,
    /// Share of respondents with a condition who never sought consultation.
    pub gap_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentOverview {
    pub total: usize,
    pub with_condition: usize,
    pub treated: usize,
    pub untreated: usize,
    pub by_occupation: GroupSummaries,
    pub by_age_band: GroupSummaries,
    pub gaps: Vec<TreatmentGap>,
}

pub fn treatment_overview(records: &[Record]) -> TreatmentOverview {
    let with_condition: Vec<&Record> = records.iter().filter(|r| r.has_condition).collect();
    let treated = with_condition
        .iter()
        .filter(|r| r.sought_consultation)
        .count();

    TreatmentOverview {
        total: records.len(),
        with_condition: with_condition.len(),
        treated,
        untreated: with_condition.len() - treated,
        by_occupation: aggregate::group_by(
            with_condition.iter().copied(),
            aggregate::by_occupation,
        ),
        by_age_band: aggregate::group_by(with_condition.iter().copied(), aggregate::by_age_band),
        gaps: treatment_gaps(records),
    }
}

pub fn treatment_gaps(records: &[Record]) -> Vec<TreatmentGap> {
    let mut gaps: Vec<TreatmentGap> = Vec::new();

    for record in records {
        let slot = match gaps.iter().position(|gap| gap.country == record.country) {
            Some(slot) => slot,
            None => {
                gaps.push(TreatmentGap {
                    country: record.country.clone(),
                    total: 0,
                    with_condition: 0,
                    gap: 0,
                    gap_rate: None,
                });
                gaps.len() - 1
            }
        };
        let entry = &mut gaps[slot];
        entry.total += 1;
        if record.has_condition {
            entry.with_condition += 1;
            if !record.sought_consultation {
                entry.gap += 1;
            }
        }
    }

    for entry in &mut gaps {
        entry.gap_rate =
            (entry.with_condition > 0).then(|| entry.gap as f64 / entry.with_condition as f64);
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StressLevel;
    use crate::scoring::tests::sample_record;
    use pretty_assertions::assert_eq;

    fn respondent(country: &str, age: u32, condition: bool, consulted: bool) -> Record {
        let mut record = sample_record(45.0, 7.0, 3.0, Some(StressLevel::Medium));
        record.country = country.to_string();
        record.age = age;
        record.has_condition = condition;
        record.sought_consultation = consulted;
        record
    }

    #[test]
    fn overview_counts_treated_and_untreated() {
        let records = vec![
            respondent("USA", 25, true, true),
            respondent("USA", 45, true, false),
            respondent("Japan", 60, false, true),
            respondent("Japan", 35, true, false),
        ];
        let overview = treatment_overview(&records);
        assert_eq!(overview.total, 4);
        assert_eq!(overview.with_condition, 3);
        assert_eq!(overview.treated, 1);
        assert_eq!(overview.untreated, 2);
        assert_eq!(overview.by_occupation.total_count(), 3);
        assert_eq!(
            overview.by_age_band.keys().collect::<Vec<_>>(),
            vec!["Young", "Mid-Career"]
        );
    }

    #[test]
    fn gaps_follow_country_order() {
        let records = vec![
            respondent("USA", 25, true, true),
            respondent("USA", 45, true, false),
            respondent("Japan", 60, false, false),
        ];
        let gaps = treatment_gaps(&records);
        assert_eq!(
            gaps,
            vec![
                TreatmentGap {
                    country: "USA".to_string(),
                    total: 2,
                    with_condition: 2,
                    gap: 1,
                    gap_rate: Some(0.5),
                },
                TreatmentGap {
                    country: "Japan".to_string(),
                    total: 1,
                    with_condition: 0,
                    gap: 0,
                    gap_rate: None,
                },
            ]
        );
    }
}
