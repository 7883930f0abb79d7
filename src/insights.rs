use serde::Serialize;

use crate::aggregate::{self, GroupSummary};
use crate::models::{ClusterLabel, DerivedScores, Record, StressLevel};
use crate::scoring;
use crate::similarity::{self, SimilarMatch, SimilarityOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Sleep,
    Stress,
    Treatment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub action: String,
}

impl Recommendation {
    fn new(category: Category, title: &str, description: String, action: &str) -> Self {
        Self {
            category,
            title: title.to_string(),
            description,
            action: action.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalInsights {
    pub scores: DerivedScores,
    pub strengths: Vec<&'static str>,
    pub challenges: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerInsights<'a> {
    pub matches: Vec<SimilarMatch<'a>>,
    pub summary: Option<GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterInsights {
    pub label: ClusterLabel,
    pub summary: Option<GroupSummary>,
    pub common_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport<'a> {
    pub personal: PersonalInsights,
    pub similar: PeerInsights<'a>,
    pub cluster: ClusterInsights,
    pub recommendations: Vec<Recommendation>,
}

pub fn generate_insights<'a>(records: &'a [Record], profile: &Record) -> InsightReport<'a> {
    let options = SimilarityOptions::default();
    let peers = similarity::find_similar(records, profile, &options);
    let scores = scoring::score(profile);

    let cluster_members: Vec<&Record> = records
        .iter()
        .filter(|record| scoring::cluster_of(record) == scores.cluster)
        .collect();
    let cluster_summary = aggregate::summarize(&scores.cluster.to_string(), cluster_members);

    // Stress-matched ranking would push every Low peer below the High ones,
    // so the coaching pool is the whole window regardless of stress or limit.
    let coaching_pool = similarity::within_tolerance(
        records,
        profile,
        &SimilarityOptions {
            match_stress: false,
            ..options
        },
    );

    InsightReport {
        personal: personal_insights(scores),
        similar: PeerInsights {
            summary: aggregate::summarize("similar", peers.iter().map(|m| m.record)),
            matches: peers,
        },
        cluster: ClusterInsights {
            label: scores.cluster,
            common_patterns: cluster_summary
                .as_ref()
                .map(common_patterns)
                .unwrap_or_default(),
            summary: cluster_summary,
        },
        recommendations: recommendations(profile, &coaching_pool),
    }
}

pub fn personal_insights(scores: DerivedScores) -> PersonalInsights {
    let worklife = scores.worklife;
    let stress = scores.stress_score();

    let mut strengths = Vec::new();
    if worklife.work > 0.7 {
        strengths.push("Balanced work hours");
    }
    if worklife.sleep > 0.7 {
        strengths.push("Healthy sleep pattern");
    }
    if worklife.activity > 0.7 {
        strengths.push("Active lifestyle");
    }
    if stress < 0.4 {
        strengths.push("Good stress management");
    }

    let mut challenges = Vec::new();
    if worklife.work < 0.4 {
        challenges.push("Work hour management");
    }
    if worklife.sleep < 0.4 {
        challenges.push("Sleep quality");
    }
    if worklife.activity < 0.4 {
        challenges.push("Physical activity");
    }
    if stress > 0.7 {
        challenges.push("Stress management");
    }

    PersonalInsights {
        scores,
        strengths,
        challenges,
    }
}

pub fn common_patterns(summary: &GroupSummary) -> Vec<String> {
    let mut patterns = Vec::new();

    if summary.mean_work_hours > 50.0 {
        patterns.push("High work hours".to_string());
    } else if summary.mean_work_hours < 35.0 {
        patterns.push("Flexible work schedule".to_string());
    }

    if summary.mean_sleep_hours < 6.0 {
        patterns.push("Sleep deficit".to_string());
    } else if summary.mean_sleep_hours > 8.0 {
        patterns.push("Good sleep habits".to_string());
    }

    if let Some(level) = summary.stress_levels.dominant() {
        patterns.push(format!("Predominantly {} stress", level.to_lowercase()));
    }

    patterns
}

/// Rules are evaluated in a fixed order and every matching rule contributes.
/// `peers` is the pool the low-stress coaching rule draws from.
pub fn recommendations(profile: &Record, peers: &[&Record]) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if profile.work_hours > 50.0 {
        out.push(Recommendation::new(
            Category::Work,
            "Consider work hour reduction",
            "Long work hours correlate with higher stress levels".to_string(),
            "Try to limit overtime and set clear boundaries",
        ));
    }

    if profile.sleep_hours < 7.0 {
        out.push(Recommendation::new(
            Category::Sleep,
            "Improve sleep duration",
            "Increased sleep is linked to better mental health outcomes".to_string(),
            "Aim for 7-9 hours of sleep per night",
        ));
    }

    if profile.stress_level == Some(StressLevel::High) {
        let low_stress: Vec<&Record> = peers
            .iter()
            .copied()
            .filter(|record| record.stress_level == Some(StressLevel::Low))
            .collect();
        if !low_stress.is_empty() {
            let average = low_stress
                .iter()
                .map(|record| record.physical_activity_hours)
                .sum::<f64>()
                / low_stress.len() as f64;
            out.push(Recommendation::new(
                Category::Stress,
                "Learn from low-stress peers",
                format!(
                    "Similar profiles with lower stress average {average:.1} hours \
                     of weekly physical activity"
                ),
                "Consider increasing physical activity",
            ));
        }
    }

    if profile.has_condition && !profile.sought_consultation {
        out.push(Recommendation::new(
            Category::Treatment,
            "Consider professional support",
            "Many professionals benefit from counseling or therapy".to_string(),
            "Explore available mental health resources",
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::tests::sample_record;
    use pretty_assertions::assert_eq;

    fn peer(id: &str, work: f64, sleep: f64, activity: f64, stress: StressLevel) -> Record {
        let mut record = sample_record(work, sleep, activity, Some(stress));
        record.id = id.to_string();
        record
    }

    fn categories(recs: &[Recommendation]) -> Vec<Category> {
        recs.iter().map(|r| r.category).collect()
    }

    #[test]
    fn all_rules_fire_in_table_order() {
        let records = vec![
            peer("1", 54.0, 6.0, 4.0, StressLevel::Low),
            peer("2", 57.0, 5.5, 6.0, StressLevel::Low),
            peer("3", 55.0, 6.0, 1.0, StressLevel::High),
        ];
        let mut profile = peer("me", 55.0, 6.0, 2.0, StressLevel::High);
        profile.has_condition = true;

        let report = generate_insights(&records, &profile);
        assert_eq!(
            categories(&report.recommendations),
            vec![
                Category::Work,
                Category::Sleep,
                Category::Stress,
                Category::Treatment
            ]
        );
        assert_eq!(
            report.recommendations[2].description,
            "Similar profiles with lower stress average 5.0 hours of weekly physical activity"
        );
    }

    #[test]
    fn lone_low_stress_peer_still_coaches_a_crowded_window() {
        let mut records: Vec<Record> = (0..12)
            .map(|i| peer(&format!("high-{i}"), 45.0, 7.0, 1.0, StressLevel::High))
            .collect();
        records.push(peer("calm", 45.0, 7.0, 4.5, StressLevel::Low));
        let profile = peer("me", 45.0, 7.0, 2.0, StressLevel::High);

        let report = generate_insights(&records, &profile);
        assert_eq!(report.similar.matches.len(), 10);
        assert_eq!(categories(&report.recommendations), vec![Category::Stress]);
        assert_eq!(
            report.recommendations[0].description,
            "Similar profiles with lower stress average 4.5 hours of weekly physical activity"
        );
    }

    #[test]
    fn healthy_profile_gets_no_recommendations() {
        let records = vec![peer("1", 40.0, 8.0, 5.0, StressLevel::Low)];
        let mut profile = peer("me", 40.0, 8.0, 8.0, StressLevel::Low);
        profile.has_condition = true;
        profile.sought_consultation = true;

        let report = generate_insights(&records, &profile);
        assert!(report.recommendations.is_empty());
        assert_eq!(
            report.personal.strengths,
            vec![
                "Balanced work hours",
                "Healthy sleep pattern",
                "Active lifestyle",
                "Good stress management"
            ]
        );
        assert!(report.personal.challenges.is_empty());
    }

    #[test]
    fn stress_coaching_needs_low_stress_peers() {
        let records = vec![peer("1", 52.0, 7.5, 2.0, StressLevel::High)];
        let profile = peer("me", 40.0, 7.5, 2.0, StressLevel::High);
        let recs = recommendations(
            &profile,
            &similarity::within_tolerance(&records, &profile, &SimilarityOptions::default()),
        );
        assert!(recs.iter().all(|r| r.category != Category::Stress));
    }

    #[test]
    fn peers_and_cluster_are_summarized() {
        let records = vec![
            peer("1", 55.0, 5.0, 2.0, StressLevel::High),
            peer("2", 56.0, 5.5, 1.0, StressLevel::High),
            peer("3", 40.0, 8.0, 10.0, StressLevel::Low),
        ];
        let profile = peer("me", 55.0, 5.0, 2.0, StressLevel::High);
        let report = generate_insights(&records, &profile);

        assert_eq!(report.cluster.label.to_string(), "Moderate-High");
        let cluster = report.cluster.summary.as_ref().unwrap();
        assert_eq!(cluster.count, 2);
        assert_eq!(
            report.cluster.common_patterns,
            vec![
                "High work hours".to_string(),
                "Sleep deficit".to_string(),
                "Predominantly high stress".to_string()
            ]
        );

        assert_eq!(report.similar.matches.len(), 2);
        assert_eq!(report.similar.matches[0].record.id, "1");
        assert_eq!(report.similar.summary.as_ref().map(|s| s.count), Some(2));
        assert_eq!(
            report.personal.challenges,
            vec!["Physical activity", "Stress management"]
        );
    }

    #[test]
    fn tied_stress_levels_resolve_to_the_later_level() {
        let records = vec![
            peer("1", 45.0, 7.0, 3.0, StressLevel::Low),
            peer("2", 45.0, 7.0, 3.0, StressLevel::High),
        ];
        let summary = aggregate::summarize("tie", &records).unwrap();
        assert_eq!(
            common_patterns(&summary),
            vec!["Predominantly high stress".to_string()]
        );
    }

    #[test]
    fn empty_population_still_reports_personal_scores() {
        let profile = peer("me", 45.0, 7.0, 3.0, StressLevel::Medium);
        let report = generate_insights(&[], &profile);
        assert!(report.similar.matches.is_empty());
        assert!(report.similar.summary.is_none());
        assert!(report.cluster.summary.is_none());
        assert!(report.cluster.common_patterns.is_empty());
    }
}
