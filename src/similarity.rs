use serde::Serialize;

use crate::models::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityOptions {
    pub work_hours_tolerance: f64,
    pub sleep_hours_tolerance: f64,
    /// Only keep candidates whose stress level equals the profile's.
    pub match_stress: bool,
    pub limit: usize,
}

impl Default for SimilarityOptions {
    fn default() -> Self {
        Self {
            work_hours_tolerance: 5.0,
            sleep_hours_tolerance: 1.0,
            match_stress: true,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarMatch<'a> {
    pub record: &'a Record,
    pub score: f64,
}

/// Heuristic ranking score. It rewards close hours and adds a full point for
/// an identical stress level, so values range over roughly [0, 2]. It is not
/// a distance metric.
pub fn similarity_score(candidate: &Record, profile: &Record) -> f64 {
    let work_diff = (candidate.work_hours - profile.work_hours).abs() / 40.0;
    let sleep_diff = (candidate.sleep_hours - profile.sleep_hours).abs() / 8.0;
    let stress_bonus = if candidate.stress_level == profile.stress_level {
        1.0
    } else {
        0.0
    };
    1.0 - (work_diff + sleep_diff) / 2.0 + stress_bonus
}

fn within_window(candidate: &Record, profile: &Record, options: &SimilarityOptions) -> bool {
    (candidate.work_hours - profile.work_hours).abs() <= options.work_hours_tolerance
        && (candidate.sleep_hours - profile.sleep_hours).abs() <= options.sleep_hours_tolerance
        && (!options.match_stress || candidate.stress_level == profile.stress_level)
}

/// Every record inside the tolerance windows, in dataset order. `limit` is
/// not applied.
pub fn within_tolerance<'a>(
    records: &'a [Record],
    profile: &Record,
    options: &SimilarityOptions,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|candidate| within_window(candidate, profile, options))
        .collect()
}

pub fn find_similar<'a>(
    records: &'a [Record],
    profile: &Record,
    options: &SimilarityOptions,
) -> Vec<SimilarMatch<'a>> {
    let mut matches: Vec<SimilarMatch<'a>> = records
        .iter()
        .filter(|candidate| within_window(candidate, profile, options))
        .map(|record| SimilarMatch {
            record,
            score: similarity_score(record, profile),
        })
        .collect();

    // sort_by is stable, so equal scores keep dataset order.
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(options.limit);
    matches
}
