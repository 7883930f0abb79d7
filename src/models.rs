use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::None,
        Severity::Low,
        Severity::Medium,
        Severity::High,
    ];

    /// Unrecognised values (including blanks) mean no reported severity.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            _ => Severity::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(StressLevel::Low),
            "medium" => Some(StressLevel::Medium),
            "high" => Some(StressLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label used wherever an unmapped stress level has to become a key.
pub fn stress_label(level: Option<StressLevel>) -> &'static str {
    level.map(|level| level.as_str()).unwrap_or("Unknown")
}

/// One normalized survey respondent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub age: u32,
    pub gender: String,
    pub occupation: String,
    pub country: String,
    pub has_condition: bool,
    pub severity: Severity,
    pub sought_consultation: bool,
    pub stress_level: Option<StressLevel>,
    pub sleep_hours: f64,
    pub work_hours: f64,
    pub physical_activity_hours: f64,
}

impl Record {
    /// Builds a query profile that is not part of any dataset. Categorical
    /// fields are left blank and flags default to false.
    pub fn profile(
        work_hours: f64,
        sleep_hours: f64,
        physical_activity_hours: f64,
        stress_level: Option<StressLevel>,
    ) -> Self {
        Record {
            id: "profile".to_string(),
            age: 0,
            gender: String::new(),
            occupation: String::new(),
            country: String::new(),
            has_condition: false,
            severity: Severity::None,
            sought_consultation: false,
            stress_level,
            sleep_hours,
            work_hours,
            physical_activity_hours,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorklifeScore {
    pub sleep: f64,
    pub work: f64,
    pub activity: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressScore {
    pub score: f64,
    pub workload_factor: bool,
    pub sleep_factor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WorklifeBucket {
    Strained,
    Moderate,
    Balanced,
}

impl WorklifeBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorklifeBucket::Strained => "Strained",
            WorklifeBucket::Moderate => "Moderate",
            WorklifeBucket::Balanced => "Balanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StressBucket {
    Low,
    Medium,
    High,
}

impl StressBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressBucket::Low => "Low",
            StressBucket::Medium => "Medium",
            StressBucket::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterLabel {
    pub worklife: WorklifeBucket,
    pub stress: StressBucket,
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.worklife.as_str(), self.stress.as_str())
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedScores {
    pub worklife: WorklifeScore,
    pub stress: StressScore,
    pub treatment_access_score: f64,
    pub cluster: ClusterLabel,
}

impl DerivedScores {
    pub fn worklife_score(&self) -> f64 {
        self.worklife.total
    }

    pub fn stress_score(&self) -> f64 {
        self.stress.score
    }
}

/// One row of the weekly "mental health care in the last 4 weeks" survey.
/// `value` is blank for suppressed estimates.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TreatmentRow {
    #[serde(rename = "Indicator", default)]
    pub indicator: String,
    #[serde(rename = "Group", default)]
    pub group: String,
    #[serde(rename = "State", default)]
    pub state: String,
    #[serde(rename = "Subgroup", default)]
    pub subgroup: String,
    #[serde(rename = "Time Period Label", default)]
    pub time_period: String,
    #[serde(rename = "Value", default)]
    pub value: Option<f64>,
    #[serde(rename = "LowCI", default)]
    pub low_ci: Option<f64>,
    #[serde(rename = "HighCI", default)]
    pub high_ci: Option<f64>,
}

/// Count distribution that remembers the order keys were first seen in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest count wins; ties go to the key seen last.
    pub fn dominant(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |current| entry.1 >= current.1) {
                best = Some(entry);
            }
        }
        best.map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_keeps_first_seen_order() {
        let mut tally = Tally::new();
        for key in ["Medium", "High", "Medium", "Low"] {
            tally.add(key);
        }
        let entries: Vec<_> = tally.iter().collect();
        assert_eq!(entries, vec![("Medium", 2), ("High", 1), ("Low", 1)]);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.get("Absent"), 0);
    }

    #[test]
    fn dominant_prefers_latest_on_ties() {
        let mut tally = Tally::new();
        for key in ["Low", "High", "High", "Low"] {
            tally.add(key);
        }
        assert_eq!(tally.dominant(), Some("High"));

        tally.add("Medium");
        tally.add("Medium");
        tally.add("Medium");
        assert_eq!(tally.dominant(), Some("Medium"));
        assert_eq!(Tally::new().dominant(), None);
    }

    #[test]
    fn tally_serializes_as_ordered_map() {
        let mut tally = Tally::new();
        tally.add("Eng");
        tally.add("Doc");
        tally.add("Eng");
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"Eng":2,"Doc":1}"#);
    }

    #[test]
    fn parsers_are_case_insensitive() {
        assert_eq!(Severity::parse(" high "), Severity::High);
        assert_eq!(Severity::parse(""), Severity::None);
        assert_eq!(StressLevel::parse("MEDIUM"), Some(StressLevel::Medium));
        assert_eq!(StressLevel::parse("Extreme"), None);
    }

    #[test]
    fn cluster_label_renders_both_buckets() {
        let label = ClusterLabel {
            worklife: WorklifeBucket::Moderate,
            stress: StressBucket::High,
        };
        assert_eq!(label.to_string(), "Moderate-High");
        assert_eq!(serde_json::to_string(&label).unwrap(), r#""Moderate-High""#);
    }
}
