use crate::models::{
    ClusterLabel, DerivedScores, Record, StressBucket, StressLevel, StressScore, WorklifeBucket,
    WorklifeScore,
};

pub fn score(record: &Record) -> DerivedScores {
    let worklife = worklife_score(record);
    let stress = stress_score(record);
    DerivedScores {
        worklife,
        stress,
        treatment_access_score: treatment_access_score(record),
        cluster: cluster_label(worklife.total, stress.score),
    }
}

pub fn cluster_of(record: &Record) -> ClusterLabel {
    score(record).cluster
}

pub fn sleep_score(hours: f64) -> f64 {
    (1.0 - (hours - 8.0).abs() / 6.0).max(0.0)
}

pub fn work_score(hours: f64) -> f64 {
    (1.0 - (hours - 40.0).abs() / 40.0).max(0.0)
}

pub fn activity_score(hours: f64) -> f64 {
    (hours / 10.0).clamp(0.0, 1.0)
}

pub fn worklife_score(record: &Record) -> WorklifeScore {
    let sleep = sleep_score(record.sleep_hours);
    let work = work_score(record.work_hours);
    let activity = activity_score(record.physical_activity_hours);
    WorklifeScore {
        sleep,
        work,
        activity,
        // min() only absorbs float rounding at the top of the range.
        total: (0.4 * sleep + 0.4 * work + 0.2 * activity).min(1.0),
    }
}

pub fn base_stress(level: Option<StressLevel>) -> f64 {
    match level {
        Some(StressLevel::Low) => 0.3,
        Some(StressLevel::Medium) => 0.6,
        Some(StressLevel::High) => 0.9,
        None => 0.6,
    }
}

pub fn stress_score(record: &Record) -> StressScore {
    let workload_factor = record.work_hours > 50.0;
    let sleep_factor = record.sleep_hours < 6.0;
    let mut score = base_stress(record.stress_level);
    if workload_factor {
        score += 0.2;
    }
    if sleep_factor {
        score += 0.2;
    }
    StressScore {
        score: score.min(1.0),
        workload_factor,
        sleep_factor,
    }
}

pub fn treatment_access_score(record: &Record) -> f64 {
    let mut access: f64 = 0.0;
    if record.sought_consultation {
        access += 0.5;
    }
    // Long hours are a barrier; the heavier tier replaces the lighter one.
    if record.work_hours > 60.0 {
        access -= 0.2;
    } else if record.work_hours > 50.0 {
        access -= 0.1;
    }
    if record.stress_level == Some(StressLevel::High) {
        access += 0.2;
    }
    access.clamp(0.0, 1.0)
}

pub fn worklife_bucket(total: f64) -> WorklifeBucket {
    if total < 0.4 {
        WorklifeBucket::Strained
    } else if total < 0.7 {
        WorklifeBucket::Moderate
    } else {
        WorklifeBucket::Balanced
    }
}

pub fn stress_bucket(score: f64) -> StressBucket {
    if score < 0.4 {
        StressBucket::Low
    } else if score < 0.7 {
        StressBucket::Medium
    } else {
        StressBucket::High
    }
}

pub fn cluster_label(worklife_total: f64, stress_score: f64) -> ClusterLabel {
    ClusterLabel {
        worklife: worklife_bucket(worklife_total),
        stress: stress_bucket(stress_score),
    }
}
