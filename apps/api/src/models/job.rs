use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::Weights;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub skills_weight: i32,
    pub experience_weight: i32,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    /// Weights as stored. Rows are written through `Weights`, so the complement always holds.
    pub fn weights(&self) -> Weights {
        Weights::from_skills(self.skills_weight).unwrap_or_default()
    }
}

/// Insert payload for a new job. Weights are validated before this is built.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub weights: Weights,
}
