//! Text Analyzer: keyword heuristics over extracted resume text.
//!
//! Never fails: empty or garbled text yields the "no match" defaults, so a
//! broken PDF still produces a well-formed (zero-scored) candidate.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::vocabulary::{POSITIONS, SKILLS, UNNAMED_CANDIDATE, UNSPECIFIED_POSITION};

/// Name must appear within this many characters of the start of the text.
const NAME_WINDOW: usize = 200;
const SUMMARY_WINDOW: usize = 300;
const SUMMARY_MAX: usize = 200;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+ [A-Z][a-z]+\b").expect("valid name pattern"));

static POSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = POSITIONS
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("valid position pattern")
});

static EXPERIENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)[\s-]*(years?|yrs?|months?)\b").expect("valid experience pattern")
});

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").expect("valid paragraph pattern"));

static LINE_BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("valid line break pattern"));

/// How year/month mentions become a total experience figure.
/// Chosen once per deployment; the two are never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExperiencePolicy {
    /// Every mention converted to months and summed.
    #[default]
    Sum,
    /// The largest year figure mentioned, in months. Month-only mentions are ignored.
    Max,
}

impl FromStr for ExperiencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            other => Err(format!("unknown experience policy '{other}' (expected 'sum' or 'max')")),
        }
    }
}

impl fmt::Display for ExperiencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => f.write_str("sum"),
            Self::Max => f.write_str("max"),
        }
    }
}

/// Everything extracted from one resume against one job description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub name: String,
    pub position: String,
    /// Vocabulary skills found in the job description.
    pub required_skills: BTreeSet<String>,
    /// Required skills also found in the resume.
    pub matched_skills: BTreeSet<String>,
    pub experience_months: u32,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnalyzer {
    policy: ExperiencePolicy,
}

impl TextAnalyzer {
    pub fn new(policy: ExperiencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ExperiencePolicy {
        self.policy
    }

    pub fn analyze(&self, resume_text: &str, job_description: &str) -> Analysis {
        let required = skills_in(job_description);
        let candidate = skills_in(resume_text);
        let matched = required.intersection(&candidate).map(|s| s.to_string()).collect();

        Analysis {
            name: extract_name(resume_text),
            position: extract_position(resume_text),
            required_skills: required.into_iter().map(String::from).collect(),
            matched_skills: matched,
            experience_months: extract_experience_months(resume_text, self.policy),
            summary: extract_summary(resume_text),
        }
    }
}

/// First `Capitalized Capitalized` pair near the start of the text.
pub fn extract_name(text: &str) -> String {
    let window = match text.char_indices().nth(NAME_WINDOW) {
        Some((idx, _)) => &text[..idx],
        None => text,
    };
    NAME_RE
        .find(window)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNNAMED_CANDIDATE.to_string())
}

/// Earliest job-title phrase in the text, reported in its canonical spelling.
pub fn extract_position(text: &str) -> String {
    POSITION_RE
        .find(text)
        .and_then(|m| {
            let found = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            POSITIONS
                .iter()
                .find(|phrase| phrase.eq_ignore_ascii_case(&found))
                .map(|phrase| phrase.to_string())
        })
        .unwrap_or_else(|| UNSPECIFIED_POSITION.to_string())
}

/// Vocabulary skills contained (case-insensitively) anywhere in the text.
pub fn skills_in(text: &str) -> BTreeSet<&'static str> {
    let lower = text.to_lowercase();
    SKILLS
        .iter()
        .copied()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .collect()
}

pub fn extract_experience_months(text: &str, policy: ExperiencePolicy) -> u32 {
    let mentions = EXPERIENCE_RE.captures_iter(text).filter_map(|caps| {
        let amount = caps[1].parse::<u32>().ok()?;
        let is_months = caps[2].to_ascii_lowercase().starts_with('m');
        Some((amount, is_months))
    });

    match policy {
        ExperiencePolicy::Sum => mentions.fold(0u32, |total, (amount, is_months)| {
            let months = if is_months {
                amount
            } else {
                amount.saturating_mul(12)
            };
            total.saturating_add(months)
        }),
        ExperiencePolicy::Max => mentions
            .filter(|(_, is_months)| !is_months)
            .map(|(years, _)| years)
            .max()
            .unwrap_or(0)
            .saturating_mul(12),
    }
}

/// Up to 300 characters of body text after the first blank line, flattened to
/// a single line and capped at 200 characters with an ellipsis.
pub fn extract_summary(text: &str) -> String {
    let body = match PARAGRAPH_BREAK_RE.find(text) {
        Some(m) => &text[m.start()..],
        None => text,
    };
    let window: String = body.chars().take(SUMMARY_WINDOW).collect();
    let flattened = LINE_BREAKS_RE.replace_all(&window, " ");
    let flattened = flattened.trim();

    if flattened.chars().count() > SUMMARY_MAX {
        let head: String = flattened.chars().take(SUMMARY_MAX - 3).collect();
        format!("{head}...")
    } else {
        flattened.to_string()
    }
}
