use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::analysis::ExperiencePolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub storage: StorageConfig,
    pub max_upload_bytes: usize,
    pub experience_policy: ExperiencePolicy,
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Files on local disk, served back under `/uploads`.
    Local {
        upload_dir: PathBuf,
        public_base_url: String,
    },
    S3(S3Settings),
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub public_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage: storage_from_env(port)?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            experience_policy: match std::env::var("EXPERIENCE_POLICY") {
                Ok(raw) => raw.parse().map_err(anyhow::Error::msg)?,
                Err(_) => ExperiencePolicy::default(),
            },
        })
    }
}

fn storage_from_env(port: u16) -> Result<StorageConfig> {
    let backend = std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());
    match backend.to_ascii_lowercase().as_str() {
        "local" => Ok(StorageConfig::Local {
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./uploads".to_string())
                .into(),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
        }),
        "s3" => {
            let bucket = require_env("S3_BUCKET")?;
            let endpoint = require_env("S3_ENDPOINT")?;
            let public_url = std::env::var("S3_PUBLIC_URL").unwrap_or_else(|_| {
                format!("{}/{}", endpoint.trim_end_matches('/'), bucket)
            });
            Ok(StorageConfig::S3(S3Settings {
                bucket,
                endpoint,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
                public_url,
            }))
        }
        other => bail!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
