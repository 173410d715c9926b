use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A scored, ranked candidate evaluation belonging to exactly one job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub position: String,
    pub file_name: String,
    /// Storage key used to delete the uploaded PDF; not exposed to clients.
    #[serde(skip_serializing, default)]
    pub file_key: String,
    pub file_url: String,
    pub skill_score: i32,
    pub experience_score: i32,
    pub overall_score: i32,
    pub skill_description: String,
    pub experience_description: String,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub experience_months: i32,
    pub rank: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to insert a resume except its rank, which the rank manager assigns.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub position: String,
    pub file_name: String,
    pub file_key: String,
    pub file_url: String,
    pub skill_score: i32,
    pub experience_score: i32,
    pub overall_score: i32,
    pub skill_description: String,
    pub experience_description: String,
    pub summary: String,
    pub matched_skills: Vec<String>,
    pub experience_months: i32,
}

