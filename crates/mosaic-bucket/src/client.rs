//! S3-compatible bucket client.

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{BucketError, BucketResult};

/// Configuration for the bucket client.
///
/// Works against anything speaking the S3 API: AWS itself, R2, MinIO.
#[derive(Debug, Clone)]
pub struct BucketConfig {
    /// S3 API endpoint URL
    pub endpoint_url: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
    /// Region ("auto" for R2 and most S3-compatibles)
    pub region: String,
}

impl BucketConfig {
    /// Create config from environment variables.
    pub fn from_env() -> BucketResult<Self> {
        Ok(Self {
            endpoint_url: std::env::var("BUCKET_ENDPOINT_URL")
                .map_err(|_| BucketError::config_error("BUCKET_ENDPOINT_URL not set"))?,
            access_key_id: std::env::var("BUCKET_ACCESS_KEY_ID")
                .map_err(|_| BucketError::config_error("BUCKET_ACCESS_KEY_ID not set"))?,
            secret_access_key: std::env::var("BUCKET_SECRET_ACCESS_KEY")
                .map_err(|_| BucketError::config_error("BUCKET_SECRET_ACCESS_KEY not set"))?,
            bucket_name: std::env::var("BUCKET_NAME")
                .map_err(|_| BucketError::config_error("BUCKET_NAME not set"))?,
            region: std::env::var("BUCKET_REGION").unwrap_or_else(|_| "auto".to_string()),
        })
    }
}

/// Client for one S3-compatible bucket.
#[derive(Clone)]
pub struct BucketClient {
    client: Client,
    bucket: String,
}

impl BucketClient {
    /// Create a new bucket client from configuration.
    pub async fn new(config: BucketConfig) -> BucketResult<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "bucket",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let client = Client::from_conf(sdk_config);

        Ok(Self {
            client,
            bucket: config.bucket_name,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> BucketResult<Self> {
        let config = BucketConfig::from_env()?;
        Self::new(config).await
    }

    /// The bucket this client talks to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload bytes under a key.
    pub async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> BucketResult<()> {
        debug!("Uploading {} bytes to {}", data.len(), key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| BucketError::upload_failed(e.to_string()))?;

        info!("Uploaded {}", key);
        Ok(())
    }

    /// Download an object as bytes.
    pub async fn download_bytes(&self, key: &str) -> BucketResult<Vec<u8>> {
        debug!("Downloading {}", key);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    BucketError::not_found(key)
                } else {
                    BucketError::DownloadFailed(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| BucketError::DownloadFailed(e.to_string()))?
            .into_bytes()
            .to_vec();

        Ok(bytes)
    }

    /// List objects with a prefix.
    pub async fn list_objects(&self, prefix: &str) -> BucketResult<Vec<ObjectInfo>> {
        debug!("Listing objects with prefix: {}", prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| BucketError::ListFailed(e.to_string()))?;

            if let Some(ref contents) = response.contents {
                for obj in contents {
                    objects.push(ObjectInfo {
                        key: obj.key.clone().unwrap_or_default(),
                        size: obj.size.unwrap_or(0) as u64,
                        last_modified: obj
                            .last_modified
                            .as_ref()
                            .and_then(|t| t.to_millis().ok())
                            .map(|ms| ms as u64),
                    });
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(objects)
    }

    /// Check connectivity by performing a head bucket operation.
    pub async fn check_connectivity(&self) -> BucketResult<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| BucketError::AwsSdk(format!("bucket connectivity check failed: {}", e)))?;
        Ok(())
    }
}

/// Information about a stored object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Object key
    pub key: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified timestamp (milliseconds since epoch)
    pub last_modified: Option<u64>,
}
