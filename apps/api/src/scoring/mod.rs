// Score calculation: normalized sub-scores and the weighted overall score.
// Pure arithmetic, no I/O. Rescoring after a weight change goes through `overall_score`
// with the stored sub-scores; extraction is never re-run.

pub mod calculator;
pub mod report;

pub use calculator::{WeightError, Weights};
pub use report::CandidateReport;
