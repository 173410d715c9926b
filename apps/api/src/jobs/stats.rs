use serde::Serialize;

use crate::models::resume::ResumeRow;
use crate::scoring::calculator::round_ratio;

/// Overall scores at or above this are "high".
pub const HIGH_SCORE: i32 = 80;
/// Overall scores at or above this (and below `HIGH_SCORE`) are "medium".
pub const MEDIUM_SCORE: i32 = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total: usize,
    pub average_skill_score: i32,
    pub average_experience_score: i32,
    pub average_overall_score: i32,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl JobStats {
    pub fn from_resumes(resumes: &[ResumeRow]) -> Self {
        if resumes.is_empty() {
            return Self::default();
        }

        let average = |score: fn(&ResumeRow) -> i32| {
            let sum: u64 = resumes.iter().map(|r| score(r).max(0) as u64).sum();
            round_ratio(sum, resumes.len() as u64) as i32
        };
        let band = |keep: fn(i32) -> bool| resumes.iter().filter(|r| keep(r.overall_score)).count();

        Self {
            total: resumes.len(),
            average_skill_score: average(|r| r.skill_score),
            average_experience_score: average(|r| r.experience_score),
            average_overall_score: average(|r| r.overall_score),
            high: band(|s| s >= HIGH_SCORE),
            medium: band(|s| (MEDIUM_SCORE..HIGH_SCORE).contains(&s)),
            low: band(|s| s < MEDIUM_SCORE),
        }
    }
}
