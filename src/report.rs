use std::fmt::Write;

use chrono::NaiveDate;

use crate::aggregate::GroupSummary;
use crate::insights::InsightReport;
use crate::models::Tally;

fn tally_line(tally: &Tally) -> String {
    tally
        .iter()
        .map(|(key, count)| format!("{key} {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn build_report(
    scope: Option<&str>,
    generated_on: NaiveDate,
    population: Option<&GroupSummary>,
    insights: &InsightReport<'_>,
) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all respondents");

    let _ = writeln!(output, "# Workplace Mental Health Insights");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        scope_label, generated_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Population");

    match population {
        Some(summary) => {
            let _ = writeln!(
                output,
                "- {} respondents, {} report a condition, {} sought consultation",
                summary.count,
                percent(summary.condition_rate),
                percent(summary.consultation_rate)
            );
            let _ = writeln!(
                output,
                "- average {:.1} work hours and {:.1} sleep hours",
                summary.mean_work_hours, summary.mean_sleep_hours
            );
            let _ = writeln!(output, "- stress levels: {}", tally_line(&summary.stress_levels));
        }
        None => {
            let _ = writeln!(output, "No respondents in this dataset.");
        }
    }

    let personal = &insights.personal;
    let scores = &personal.scores;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Personal Scores");
    let _ = writeln!(
        output,
        "- work-life {:.2} (sleep {:.2}, work {:.2}, activity {:.2})",
        scores.worklife_score(),
        scores.worklife.sleep,
        scores.worklife.work,
        scores.worklife.activity
    );
    let _ = writeln!(output, "- stress {:.2}", scores.stress_score());
    let _ = writeln!(output, "- treatment access {:.2}", scores.treatment_access_score);
    let _ = writeln!(output, "- cluster {}", scores.cluster);
    if !personal.strengths.is_empty() {
        let _ = writeln!(output, "- strengths: {}", personal.strengths.join(", "));
    }
    if !personal.challenges.is_empty() {
        let _ = writeln!(output, "- challenges: {}", personal.challenges.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Similar Profiles");

    match &insights.similar.summary {
        Some(summary) => {
            let _ = writeln!(
                output,
                "{} similar respondents averaging {:.1} work hours and {:.1} sleep hours",
                summary.count, summary.mean_work_hours, summary.mean_sleep_hours
            );
            for found in insights.similar.matches.iter().take(5) {
                let record = found.record;
                let _ = writeln!(
                    output,
                    "- #{} ({}, {}) score {:.2}: {:.0}h work, {:.1}h sleep",
                    record.id,
                    record.occupation,
                    record.country,
                    found.score,
                    record.work_hours,
                    record.sleep_hours
                );
            }
        }
        None => {
            let _ = writeln!(output, "No similar respondents found.");
        }
    }

    let cluster = &insights.cluster;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Cluster {}", cluster.label);

    match &cluster.summary {
        Some(summary) => {
            let _ = writeln!(
                output,
                "- {} respondents, {} report a condition, {} sought consultation",
                summary.count,
                percent(summary.condition_rate),
                percent(summary.consultation_rate)
            );
            for pattern in &cluster.common_patterns {
                let _ = writeln!(output, "- {pattern}");
            }
        }
        None => {
            let _ = writeln!(output, "No respondents share this cluster.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");

    if insights.recommendations.is_empty() {
        let _ = writeln!(output, "No recommendations for this profile.");
    } else {
        for rec in &insights.recommendations {
            let _ = writeln!(output, "- **{}**: {} {}.", rec.title, rec.description, rec.action);
        }
    }

    output
}
