//! Candidate report: analysis plus scores plus the human-readable descriptions
//! stored alongside them.

use std::collections::BTreeSet;

use crate::analysis::Analysis;
use crate::scoring::calculator::{score, ScoreCard, Weights};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub name: String,
    pub position: String,
    pub scores: ScoreCard,
    pub skill_description: String,
    pub experience_description: String,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub experience_months: u32,
}

impl CandidateReport {
    pub fn build(analysis: Analysis, weights: Weights) -> Self {
        let required = analysis.required_skills.len();
        let scores = score(
            analysis.matched_skills.len(),
            required,
            analysis.experience_months,
            weights,
        );

        Self {
            skill_description: skill_description(&analysis.matched_skills, required),
            experience_description: experience_description(analysis.experience_months),
            name: analysis.name,
            position: analysis.position,
            scores,
            summary: analysis.summary,
            matched_skills: analysis.matched_skills.into_iter().collect(),
            experience_months: analysis.experience_months,
        }
    }
}

pub fn skill_description(matched: &BTreeSet<String>, required: usize) -> String {
    if required == 0 {
        return "No recognised skills in job description".to_string();
    }
    if matched.is_empty() {
        return format!("Matched 0 of {required} required skills");
    }
    let names: Vec<&str> = matched.iter().map(String::as_str).collect();
    format!(
        "Matched {} of {required} required skills: {}",
        matched.len(),
        names.join(", ")
    )
}

pub fn experience_description(months: u32) -> String {
    if months == 0 {
        return "No clear experience information found".to_string();
    }
    let years = (months as u64 + 6) / 12;
    match years {
        0 => format!("Approximately {months} months of experience"),
        1 => "Approximately 1 year of experience".to_string(),
        n => format!("Approximately {n} years of experience"),
    }
}
