//! Score Calculator: skill ratio and experience months into 0–100 sub-scores,
//! combined by the job's weights into the overall score.
//!
//! All rounding is round-half-up on exact integer ratios, so `57.5` becomes `58`
//! without any floating point drift.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Months of experience that earn a full experience score (5 years).
pub const IDEAL_EXPERIENCE_MONTHS: u32 = 60;

const MAX_SCORE: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WeightError {
    #[error("skillsWeight must be between 0 and 100, got {0}")]
    OutOfRange(i32),

    #[error("experienceWeight must equal 100 - skillsWeight ({expected}), got {actual}")]
    NotComplement { expected: i32, actual: i32 },
}

/// A job's weight configuration. Only the skills weight is free;
/// the experience weight is always its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    skills: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self { skills: 50 }
    }
}

impl Weights {
    pub fn from_skills(skills_weight: i32) -> Result<Self, WeightError> {
        if !(0..=100).contains(&skills_weight) {
            return Err(WeightError::OutOfRange(skills_weight));
        }
        Ok(Self {
            skills: skills_weight,
        })
    }

    /// Accepts an optional experience weight from a client, which must match the complement.
    pub fn from_pair(skills_weight: i32, experience_weight: Option<i32>) -> Result<Self, WeightError> {
        let weights = Self::from_skills(skills_weight)?;
        match experience_weight {
            Some(actual) if actual != weights.experience() => Err(WeightError::NotComplement {
                expected: weights.experience(),
                actual,
            }),
            _ => Ok(weights),
        }
    }

    pub fn skills(&self) -> i32 {
        self.skills
    }

    pub fn experience(&self) -> i32 {
        100 - self.skills
    }
}

/// The three persisted scores of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub skill_score: i32,
    pub experience_score: i32,
    pub overall_score: i32,
}

/// Round-half-up of `numerator / denominator` for non-negative integers.
pub(crate) fn round_ratio(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// `round(min(100, matched / max(1, required) * 100))`
pub fn skill_score(matched: usize, required: usize) -> i32 {
    let required = required.max(1) as u64;
    let raw = round_ratio(matched as u64 * MAX_SCORE, required);
    raw.min(MAX_SCORE) as i32
}

/// `round(min(100, months / 60 * 100))`
pub fn experience_score(months: u32) -> i32 {
    let raw = round_ratio(months as u64 * MAX_SCORE, IDEAL_EXPERIENCE_MONTHS as u64);
    raw.min(MAX_SCORE) as i32
}

/// `round(skill * skillsWeight/100 + experience * experienceWeight/100)`
pub fn overall_score(skill_score: i32, experience_score: i32, weights: Weights) -> i32 {
    let skill = skill_score.clamp(0, 100) as u64;
    let experience = experience_score.clamp(0, 100) as u64;
    let weighted = skill * weights.skills() as u64 + experience * weights.experience() as u64;
    round_ratio(weighted, 100).min(MAX_SCORE) as i32
}

/// Scores a freshly analyzed candidate.
pub fn score(matched: usize, required: usize, experience_months: u32, weights: Weights) -> ScoreCard {
    let skill_score = skill_score(matched, required);
    let experience_score = experience_score(experience_months);
    ScoreCard {
        skill_score,
        experience_score,
        overall_score: overall_score(skill_score, experience_score, weights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_score_three_of_five_is_sixty() {
        assert_eq!(skill_score(3, 5), 60);
    }

    #[test]
    fn test_skill_score_no_required_skills_is_zero() {
        assert_eq!(skill_score(0, 0), 0);
    }

    #[test]
    fn test_skill_score_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(skill_score(1, 8), 13);
        // 2/3 = 66.67%
        assert_eq!(skill_score(2, 3), 67);
    }

    #[test]
    fn test_skill_score_capped_at_hundred() {
        assert_eq!(skill_score(7, 5), 100);
    }

    #[test]
    fn test_experience_score_thirty_months_is_fifty() {
        assert_eq!(experience_score(30), 50);
    }

    #[test]
    fn test_experience_score_ceiling_at_sixty_months() {
        assert_eq!(experience_score(60), 100);
        assert_eq!(experience_score(240), 100);
        assert_eq!(experience_score(0), 0);
    }

    #[test]
    fn test_overall_score_weighted_seventy_thirty() {
        let weights = Weights::from_skills(70).unwrap();
        assert_eq!(overall_score(60, 50, weights), 57);
    }

    #[test]
    fn test_overall_score_half_rounds_up() {
        // 55 * 0.5 + 60 * 0.5 = 57.5
        let weights = Weights::from_skills(50).unwrap();
        assert_eq!(overall_score(55, 60, weights), 58);
    }

    #[test]
    fn test_scenario_five_years_three_of_five_skills() {
        let weights = Weights::from_skills(70).unwrap();
        let card = score(3, 5, 60, weights);
        assert_eq!(
            card,
            ScoreCard {
                skill_score: 60,
                experience_score: 100,
                overall_score: 72,
            }
        );
    }

    #[test]
    fn test_score_all_zero_inputs() {
        let card = score(0, 0, 0, Weights::default());
        assert_eq!(card.skill_score, 0);
        assert_eq!(card.experience_score, 0);
        assert_eq!(card.overall_score, 0);
    }

    #[test]
    fn test_experience_weight_is_complement() {
        for skills in [0, 1, 35, 50, 99, 100] {
            let weights = Weights::from_skills(skills).unwrap();
            assert_eq!(weights.experience(), 100 - skills);
        }
    }

    #[test]
    fn test_weights_out_of_range_rejected() {
        assert_eq!(Weights::from_skills(101), Err(WeightError::OutOfRange(101)));
        assert_eq!(Weights::from_skills(-1), Err(WeightError::OutOfRange(-1)));
    }

    #[test]
    fn test_weights_pair_must_be_complement() {
        assert!(Weights::from_pair(70, Some(30)).is_ok());
        assert!(Weights::from_pair(70, None).is_ok());
        assert_eq!(
            Weights::from_pair(70, Some(40)),
            Err(WeightError::NotComplement {
                expected: 30,
                actual: 40
            })
        );
    }
}
