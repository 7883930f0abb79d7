//! Scoring, grouping and peer-comparison over an occupational mental-health
//! survey. The loader in [`dataset`] is the only part that touches the
//! filesystem; everything else is pure computation over normalized records.

pub mod aggregate;
pub mod charts;
pub mod dataset;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod report;
pub mod scoring;
pub mod similarity;
pub mod treatment;

pub use aggregate::{group_by, GroupKey, GroupSummaries, GroupSummary};
pub use insights::{generate_insights, InsightReport};
pub use models::{DerivedScores, Record, Severity, StressLevel};
pub use normalize::{normalize, Normalized, RawRow};
pub use scoring::score;
pub use similarity::{find_similar, SimilarMatch, SimilarityOptions};
