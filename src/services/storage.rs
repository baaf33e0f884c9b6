// src/services/storage.rs
//! Object-store client for uploaded file bytes.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

use crate::common::config::StorageConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store credentials not configured")]
    NotConfigured,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("S3 operation failed: {0}")]
    S3Error(String),
}

/// Seam to the external object store: keyed binary uploads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct S3Storage {
    config: StorageConfig,
}

impl S3Storage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Initialize an S3 client from the startup credentials. Each call builds
    /// a fresh client; nothing is pooled or cached between requests.
    async fn get_s3_client(&self) -> Result<(S3Client, String), StorageError> {
        if self.config.bucket.is_empty() {
            return Err(StorageError::InvalidConfig(
                "S3 bucket name not configured".to_string(),
            ));
        }

        let (access_key_id, secret_access_key) = match (
            self.config.access_key_id.as_deref(),
            self.config.secret_access_key.as_deref(),
        ) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(StorageError::NotConfigured),
        };

        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "config");
        let region = Region::new(self.config.region.clone());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        Ok((S3Client::new(&aws_config), self.config.bucket.clone()))
    }
}

#[async_trait]
impl BlobStore for S3Storage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let (client, bucket) = self.get_s3_client().await?;

        let body = ByteStream::from(Bytes::from(data));

        client
            .put_object()
            .bucket(&bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to upload object to S3");
                StorageError::S3Error(format!("Upload failed: {}", e))
            })?;

        info!(key = %key, bucket = %bucket, "Object uploaded to S3 successfully");
        Ok(())
    }
}
