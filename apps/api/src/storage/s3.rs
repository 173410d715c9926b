use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::S3Settings;
use crate::storage::{FileStorage, StorageError, StoredFile};

pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl S3Storage {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn connect(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "screener-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&settings.endpoint)
            .load()
            .await;

        info!("S3 client initialized for bucket {}", settings.bucket);

        Self {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: settings.bucket.clone(),
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredFile, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded s3://{}/{}", self.bucket, key);

        Ok(StoredFile {
            key: key.to_string(),
            url: format!("{}/{}", self.public_url, key),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("delete of {key} failed: {e}")))?;
        Ok(())
    }
}
