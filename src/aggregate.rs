use std::collections::HashMap;

use clap::ValueEnum;
use serde::Serialize;

use crate::models::{stress_label, Record, StressLevel, Tally};
use crate::scoring;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub mean_age: f64,
    pub mean_sleep_hours: f64,
    pub mean_work_hours: f64,
    pub mean_physical_activity_hours: f64,
    pub condition_rate: f64,
    pub consultation_rate: f64,
    pub high_stress_rate: f64,
    pub poor_sleep_rate: f64,
    pub overwork_rate: f64,
    pub untreated_rate: f64,
    pub stress_levels: Tally,
    pub severities: Tally,
    pub occupations: Tally,
    pub countries: Tally,
    pub genders: Tally,
    pub tribes: Tally,
    pub work_pattern: Tally,
    pub sleep_pattern: Tally,
}

/// Running totals for one group; only ever created with its first member.
#[derive(Default)]
struct Accumulator {
    count: usize,
    age: f64,
    sleep: f64,
    work: f64,
    activity: f64,
    with_condition: usize,
    consulted: usize,
    high_stress: usize,
    poor_sleep: usize,
    overworked: usize,
    untreated: usize,
    stress_levels: Tally,
    severities: Tally,
    occupations: Tally,
    countries: Tally,
    genders: Tally,
    tribes: Tally,
    work_pattern: Tally,
    sleep_pattern: Tally,
}

impl Accumulator {
    fn add(&mut self, record: &Record) {
        self.count += 1;
        self.age += f64::from(record.age);
        self.sleep += record.sleep_hours;
        self.work += record.work_hours;
        self.activity += record.physical_activity_hours;

        if record.has_condition {
            self.with_condition += 1;
            if !record.sought_consultation {
                self.untreated += 1;
            }
        }
        if record.sought_consultation {
            self.consulted += 1;
        }
        if record.stress_level == Some(StressLevel::High) {
            self.high_stress += 1;
        }
        if record.sleep_hours < 6.0 {
            self.poor_sleep += 1;
        }
        if record.work_hours > 50.0 {
            self.overworked += 1;
        }

        self.stress_levels.add(stress_label(record.stress_level));
        self.severities.add(record.severity.as_str());
        self.occupations.add(&record.occupation);
        self.countries.add(&record.country);
        self.genders.add(&record.gender);
        self.tribes.add(&by_tribe(record));
        self.work_pattern.add(work_pattern(record.work_hours));
        self.sleep_pattern.add(sleep_pattern(record.sleep_hours));
    }

    fn finish(self, key: String) -> GroupSummary {
        let n = self.count as f64;
        let rate = |part: usize| part as f64 / n;
        GroupSummary {
            key,
            count: self.count,
            mean_age: self.age / n,
            mean_sleep_hours: self.sleep / n,
            mean_work_hours: self.work / n,
            mean_physical_activity_hours: self.activity / n,
            condition_rate: rate(self.with_condition),
            consultation_rate: rate(self.consulted),
            high_stress_rate: rate(self.high_stress),
            poor_sleep_rate: rate(self.poor_sleep),
            overwork_rate: rate(self.overworked),
            untreated_rate: rate(self.untreated),
            stress_levels: self.stress_levels,
            severities: self.severities,
            occupations: self.occupations,
            countries: self.countries,
            genders: self.genders,
            tribes: self.tribes,
            work_pattern: self.work_pattern,
            sleep_pattern: self.sleep_pattern,
        }
    }
}

/// Group summaries in the order their keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupSummaries {
    groups: Vec<GroupSummary>,
}

impl GroupSummaries {
    pub fn get(&self, key: &str) -> Option<&GroupSummary> {
        self.groups.iter().find(|group| group.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupSummary> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|group| group.count).sum()
    }
}

impl<'a> IntoIterator for &'a GroupSummaries {
    type Item = &'a GroupSummary;
    type IntoIter = std::slice::Iter<'a, GroupSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

pub fn group_by<'a, I, F>(records: I, key_fn: F) -> GroupSummaries
where
    I: IntoIterator<Item = &'a Record>,
    F: Fn(&Record) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut ordered: Vec<(String, Accumulator)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), ordered.len());
                ordered.push((key, Accumulator::default()));
                ordered.len() - 1
            }
        };
        ordered[slot].1.add(record);
    }

    GroupSummaries {
        groups: ordered
            .into_iter()
            .map(|(key, accumulator)| accumulator.finish(key))
            .collect(),
    }
}

/// Summarize a whole record set under one key; `None` when there is nothing
/// to summarize.
pub fn summarize<'a, I>(key: &str, records: I) -> Option<GroupSummary>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut accumulator = Accumulator::default();
    for record in records {
        accumulator.add(record);
    }
    (accumulator.count > 0).then(|| accumulator.finish(key.to_string()))
}

pub fn work_pattern(hours: f64) -> &'static str {
    if hours < 35.0 {
        "underworked"
    } else if hours <= 45.0 {
        "normal"
    } else {
        "overworked"
    }
}

pub fn sleep_pattern(hours: f64) -> &'static str {
    if hours < 6.0 {
        "veryLow"
    } else if hours < 7.0 {
        "low"
    } else if hours < 9.0 {
        "normal"
    } else if hours < 10.0 {
        "high"
    } else {
        "veryHigh"
    }
}

pub fn age_band(age: u32) -> &'static str {
    if age < 30 {
        "Young"
    } else if age < 50 {
        "Mid-Career"
    } else {
        "Senior"
    }
}

pub fn by_occupation(record: &Record) -> String {
    record.occupation.clone()
}

pub fn by_country(record: &Record) -> String {
    record.country.clone()
}

pub fn by_gender(record: &Record) -> String {
    record.gender.clone()
}

pub fn by_severity(record: &Record) -> String {
    record.severity.to_string()
}

pub fn by_stress_level(record: &Record) -> String {
    stress_label(record.stress_level).to_string()
}

pub fn by_age_band(record: &Record) -> String {
    age_band(record.age).to_string()
}

pub fn by_cluster(record: &Record) -> String {
    scoring::cluster_of(record).to_string()
}

pub fn by_worklife_bucket(record: &Record) -> String {
    scoring::cluster_of(record).worklife.as_str().to_string()
}

pub fn by_tribe(record: &Record) -> String {
    let sleep = if record.sleep_hours < 6.0 {
        "Irregular"
    } else if record.sleep_hours > 8.0 {
        "Long"
    } else {
        "Normal"
    };
    let work = if record.work_hours < 35.0 {
        "Part-Time"
    } else if record.work_hours > 50.0 {
        "High-Intensity"
    } else {
        "Standard"
    };
    format!("{}/{}/{}", age_band(record.age), sleep, work)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupKey {
    Occupation,
    Country,
    Gender,
    Severity,
    Stress,
    AgeBand,
    Tribe,
    Cluster,
    Worklife,
}

impl GroupKey {
    pub fn key_fn(self) -> fn(&Record) -> String {
        match self {
            GroupKey::Occupation => by_occupation,
            GroupKey::Country => by_country,
            GroupKey::Gender => by_gender,
            GroupKey::Severity => by_severity,
            GroupKey::Stress => by_stress_level,
            GroupKey::AgeBand => by_age_band,
            GroupKey::Tribe => by_tribe,
            GroupKey::Cluster => by_cluster,
            GroupKey::Worklife => by_worklife_bucket,
        }
    }
}
