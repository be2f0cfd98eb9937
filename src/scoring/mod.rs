// * Scoring: per-category confidence and the weighted score / gap analysis

pub mod confidence;
pub mod gap_analyzer;

pub use confidence::{category_score, confidence_scores};
pub use gap_analyzer::{analyze, score, ScoreBreakdown, ScoreReport};
