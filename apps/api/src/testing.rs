//! Shared fixtures for unit and router tests: in-memory collaborators and
//! builders for jobs and resumes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::analysis::{ExperiencePolicy, TextExtractor};
use crate::config::{Config, S3Settings, StorageConfig};
use crate::models::job::{JobRow, NewJob};
use crate::models::resume::{NewResume, ResumeRow};
use crate::scoring::Weights;
use crate::state::AppState;
use crate::storage::{FileStorage, StorageError, StoredFile};
use crate::store::memory::MemoryStore;
use crate::store::ScreeningStore;

/// Treats everything after the first line (the `%PDF-x.y` header) as the document text.
pub struct FakeExtractor;

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, document: Bytes) -> String {
        let text = String::from_utf8_lossy(&document);
        text.split_once('\n')
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        _content_type: &str,
    ) -> Result<StoredFile, StorageError> {
        self.files.lock().unwrap().insert(key.to_string(), body);
        Ok(StoredFile {
            key: key.to_string(),
            url: format!("http://files.test/{key}"),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.files.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/screener_test".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        storage: StorageConfig::S3(S3Settings {
            bucket: "resumes".to_string(),
            endpoint: "http://files.test".to_string(),
            access_key_id: "test".to_string(),
            secret_access_key: "test".to_string(),
            public_url: "http://files.test".to_string(),
        }),
        max_upload_bytes: 1024 * 1024,
        experience_policy: ExperiencePolicy::Sum,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub files: Arc<MemoryStorage>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::default());
    let files = Arc::new(MemoryStorage::default());
    let state = AppState::new(
        store.clone(),
        files.clone(),
        Arc::new(FakeExtractor),
        test_config(),
    );
    TestApp {
        state,
        store,
        files,
    }
}

pub async fn insert_job(store: &dyn ScreeningStore, skills_weight: i32) -> JobRow {
    store
        .insert_job(NewJob {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend Developer".to_string(),
            description: "Python, Docker and AWS".to_string(),
            weights: Weights::from_skills(skills_weight).unwrap(),
        })
        .await
        .unwrap()
}

/// A resume whose sub-scores both equal `overall`, so it keeps that overall
/// score under any weights.
pub fn new_resume(job_id: Uuid, overall: i32) -> NewResume {
    new_resume_with(job_id, overall, overall, overall)
}

pub fn new_resume_with(
    job_id: Uuid,
    skill_score: i32,
    experience_score: i32,
    overall_score: i32,
) -> NewResume {
    let id = Uuid::new_v4();
    NewResume {
        id,
        job_id,
        name: "Jane Doe".to_string(),
        position: "Software Engineer".to_string(),
        file_name: "cv.pdf".to_string(),
        file_key: format!("resumes/{id}-cv.pdf"),
        file_url: format!("http://files.test/resumes/{id}-cv.pdf"),
        skill_score,
        experience_score,
        overall_score,
        skill_description: String::new(),
        experience_description: String::new(),
        summary: String::new(),
        matched_skills: Vec::new(),
        experience_months: 0,
    }
}

pub fn resume_row(skill_score: i32, experience_score: i32, overall_score: i32, rank: i32) -> ResumeRow {
    let resume = new_resume_with(Uuid::nil(), skill_score, experience_score, overall_score);
    ResumeRow {
        id: resume.id,
        job_id: resume.job_id,
        name: resume.name,
        position: resume.position,
        file_name: resume.file_name,
        file_key: resume.file_key,
        file_url: resume.file_url,
        skill_score,
        experience_score,
        overall_score,
        skill_description: resume.skill_description,
        experience_description: resume.experience_description,
        summary: resume.summary,
        matched_skills: resume.matched_skills,
        experience_months: resume.experience_months,
        rank,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
