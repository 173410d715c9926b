//! Multipart upload parsing and validation. Everything here runs before any
//! analysis, so a rejected upload leaves no trace.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Multipart field names.
pub const JOB_ID_FIELD: &str = "jobId";
pub const FILE_FIELD: &str = "resume";
pub const NAME_FIELD: &str = "candidateName";
pub const POSITION_FIELD: &str = "position";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw form contents, nothing validated yet.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub job_id: Option<String>,
    pub file: Option<UploadedFile>,
    pub candidate_name: Option<String>,
    pub position: Option<String>,
}

/// A validated upload.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub job_id: Uuid,
    pub file: UploadedFile,
    pub candidate_name: Option<String>,
    pub position: Option<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                FILE_FIELD => {
                    let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.file = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                JOB_ID_FIELD => form.job_id = Some(field.text().await.map_err(multipart_error)?),
                NAME_FIELD => {
                    form.candidate_name = Some(field.text().await.map_err(multipart_error)?)
                }
                POSITION_FIELD => form.position = Some(field.text().await.map_err(multipart_error)?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Checks in order: required fields, PDF type, size.
    pub fn validate(self, max_bytes: usize) -> Result<ResumeUpload, AppError> {
        let job_id = match self.job_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Uuid::parse_str(raw)
                .map_err(|_| AppError::Validation(format!("{JOB_ID_FIELD} is not a valid id")))?,
            _ => return Err(AppError::Validation(format!("{JOB_ID_FIELD} is required"))),
        };
        let file = self
            .file
            .ok_or_else(|| AppError::Validation(format!("{FILE_FIELD} file is required")))?;

        if !is_pdf(&file) {
            return Err(AppError::UnsupportedMediaType(format!(
                "{} is not a PDF",
                file.file_name
            )));
        }
        if file.bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "{} is {} bytes, limit is {max_bytes}",
                file.file_name,
                file.bytes.len()
            )));
        }

        Ok(ResumeUpload {
            job_id,
            file,
            candidate_name: non_blank(self.candidate_name),
            position: non_blank(self.position),
        })
    }
}

/// Declared as a PDF (content type or extension) and starts with the PDF header.
pub fn is_pdf(file: &UploadedFile) -> bool {
    let declared = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        || file.file_name.to_ascii_lowercase().ends_with(".pdf");
    declared && file.bytes.starts_with(PDF_MAGIC)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
