//! Image upload boundary: local checks, then hand the bytes to an external host.

use crate::error::AppError;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn ensure_image_type(content_type: &str) -> Result<(), AppError> {
    if content_type.trim().to_ascii_lowercase().starts_with("image/") {
        Ok(())
    } else {
        Err(AppError::BadRequest("Only image files are allowed".into()))
    }
}

pub fn ensure_size(len: usize) -> Result<(), AppError> {
    if len > MAX_IMAGE_BYTES {
        return Err(AppError::PayloadTooLarge("Image must be 10 MB or smaller".into()));
    }
    Ok(())
}

/// Rejects non-image content types, empty files and files over [`MAX_IMAGE_BYTES`].
pub fn validate_image(content_type: &str, len: usize) -> Result<(), AppError> {
    ensure_image_type(content_type)?;
    if len == 0 {
        return Err(AppError::BadRequest("No file uploaded".into()));
    }
    ensure_size(len)
}

/// `uploads/<uuid>.<ext>`, extension taken from the image subtype.
pub fn object_key(content_type: &str) -> String {
    let subtype = content_type
        .split(';')
        .next()
        .and_then(|t| t.trim().split('/').nth(1))
        .unwrap_or("")
        .to_ascii_lowercase();
    let ext = match subtype.as_str() {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => other.chars().filter(|c| c.is_ascii_alphanumeric()).collect(),
    };
    let id = uuid::Uuid::new_v4();
    if ext.is_empty() {
        format!("uploads/{}", id)
    } else {
        format!("uploads/{}.{}", id, ext)
    }
}

/// Somewhere images live after upload. Returns a public HTTPS URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn store(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError>;
}

pub struct S3ImageHost {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3ImageHost {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base: Option<String>) -> Self {
        let public_base = public_base.unwrap_or_else(|| format!("https://{}.s3.amazonaws.com", bucket));
        S3ImageHost {
            client,
            bucket,
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Credentials and region from the standard AWS provider chain.
    pub async fn from_env(bucket: String, public_base: Option<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket, public_base)
    }
}

#[async_trait]
impl ImageHost for S3ImageHost {
    async fn store(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put {}: {}", key, e)))?;
        tracing::info!(bucket = %self.bucket, key, size, "image stored");
        Ok(format!("{}/{}", self.public_base, key))
    }
}
