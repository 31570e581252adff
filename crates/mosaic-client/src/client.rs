//! Mosaic API HTTP client.
//!
//! Wraps the upload, run, and output endpoints behind typed calls. JSON
//! calls carry the bearer key; raw transfers to pre-signed URLs do not.

use std::path::Path;
use std::time::Duration;

use reqwest::{Body, Client, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use mosaic_models::{guess_content_type, FileId, RunId, RunOutput, RunSnapshot, RunSpec, RunTarget};

use crate::config::{MosaicConfig, MIN_FILE_BYTES};
use crate::error::{MosaicError, MosaicResult};
use crate::types::{
    FinalizeUploadResponse, RunAgentRequest, RunAgentResponse, RunOutputsResponse,
    UploadUrlRequest, UploadUrlResponse,
};

/// Client for the Mosaic video editing API.
#[derive(Clone)]
pub struct MosaicClient {
    http: Client,
    config: MosaicConfig,
}

impl MosaicClient {
    /// Create a new client.
    pub fn new(config: MosaicConfig) -> MosaicResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(MosaicError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("mosaic-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(MosaicError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MosaicResult<Self> {
        Self::new(MosaicConfig::from_env()?)
    }

    /// The active configuration.
    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    /// Reserve a pre-signed upload slot for a file.
    pub async fn create_upload_slot(
        &self,
        filename: &str,
        file_size: u64,
        content_type: &str,
    ) -> MosaicResult<UploadUrlResponse> {
        let url = format!("{}/video/get-upload-url", self.config.base_url);
        let request = UploadUrlRequest {
            filename: filename.to_string(),
            file_size,
            content_type: content_type.to_string(),
        };

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(MosaicError::Network)?;
                Self::check(response).await
            })
            .await?;

        Ok(response.json().await?)
    }

    /// PUT raw bytes to a pre-signed upload URL.
    ///
    /// The URL is already authorized; sending the bearer key here would
    /// break some storage backends' signature checks.
    pub async fn put_upload(
        &self,
        upload_url: &str,
        content_type: &str,
        body: Body,
    ) -> MosaicResult<()> {
        let response = self
            .http
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .timeout(self.config.transfer_timeout)
            .body(body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(MosaicError::UploadFailed(format!(
                    "storage returned {}: {}",
                    status, body
                )))
            }
        }
    }

    /// Tell the API the raw bytes are all in place.
    pub async fn finalize_upload(&self, video_id: &str) -> MosaicResult<FileId> {
        let url = format!("{}/video/finalize-upload/{}", self.config.base_url, video_id);

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&serde_json::json!({}))
                    .send()
                    .await
                    .map_err(MosaicError::Network)?;
                Self::check(response).await
            })
            .await?;

        let finalized: FinalizeUploadResponse = response.json().await?;
        Ok(finalized.file_uuid)
    }

    /// Upload a local file, streaming it from disk.
    ///
    /// Runs the full slot / PUT / finalize sequence and returns the
    /// durable asset id.
    pub async fn upload_file(&self, path: &Path) -> MosaicResult<FileId> {
        let metadata = tokio::fs::metadata(path).await?;
        let file_size = metadata.len();
        self.validate_size(file_size)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MosaicError::UploadFailed(format!("unusable path: {}", path.display())))?;
        let content_type = guess_content_type(filename);

        info!(
            "Uploading {} ({} bytes, {})",
            filename, file_size, content_type
        );

        let slot = self
            .create_upload_slot(filename, file_size, content_type)
            .await?;

        let file = File::open(path).await?;
        let body = Body::wrap_stream(ReaderStream::new(file));
        self.put_upload(&slot.upload_url, content_type, body).await?;

        let file_id = self.finalize_upload(&slot.video_id).await?;
        info!("Upload complete: {} -> {}", filename, file_id);
        Ok(file_id)
    }

    /// Upload an in-memory buffer under the given filename.
    pub async fn upload_bytes(&self, filename: &str, bytes: Vec<u8>) -> MosaicResult<FileId> {
        let file_size = bytes.len() as u64;
        self.validate_size(file_size)?;
        let content_type = guess_content_type(filename);

        info!(
            "Uploading {} ({} bytes, {})",
            filename, file_size, content_type
        );

        let slot = self
            .create_upload_slot(filename, file_size, content_type)
            .await?;
        self.put_upload(&slot.upload_url, content_type, Body::from(bytes))
            .await?;

        let file_id = self.finalize_upload(&slot.video_id).await?;
        info!("Upload complete: {} -> {}", filename, file_id);
        Ok(file_id)
    }

    /// Fetch a remote video over plain HTTP and upload it.
    ///
    /// The advertised Content-Length is checked before any bytes move, and
    /// the actual byte count is checked again while downloading, so a lying
    /// server cannot push past the ceiling.
    pub async fn upload_from_url(&self, source_url: &str) -> MosaicResult<FileId> {
        let parsed = url::Url::parse(source_url)
            .map_err(|e| MosaicError::InvalidUrl(format!("{}: {}", source_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(MosaicError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        let filename = parsed
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|s| !s.is_empty())
            .unwrap_or("video.mp4")
            .to_string();

        debug!("Fetching {} as {}", source_url, filename);

        let response = self
            .http
            .get(source_url)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MosaicError::from_status(status, body));
        }

        if let Some(advertised) = response.content_length() {
            if advertised > self.config.max_file_bytes {
                return Err(MosaicError::FileTooLarge {
                    size: advertised,
                    max: self.config.max_file_bytes,
                });
            }
        }

        let mut bytes: Vec<u8> = Vec::new();
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() as u64 + chunk.len() as u64 > self.config.max_file_bytes {
                return Err(MosaicError::FileTooLarge {
                    size: bytes.len() as u64 + chunk.len() as u64,
                    max: self.config.max_file_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        self.upload_bytes(&filename, bytes).await
    }

    fn validate_size(&self, size: u64) -> MosaicResult<()> {
        if size < MIN_FILE_BYTES {
            return Err(MosaicError::FileTooSmall {
                size,
                min: MIN_FILE_BYTES,
            });
        }
        if size > self.config.max_file_bytes {
            return Err(MosaicError::FileTooLarge {
                size,
                max: self.config.max_file_bytes,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Runs
    // =========================================================================

    /// Start an agent run and return its id.
    pub async fn run_agent(&self, spec: &RunSpec) -> MosaicResult<RunId> {
        let url = format!("{}/run-agent", self.config.base_url);

        let request = match &spec.target {
            RunTarget::Agent(agent_id) => RunAgentRequest {
                agent_id: Some(agent_id.clone()),
                file_id: spec.file_id.clone(),
                auto: spec.auto,
                prompt: None,
                parameters: spec.parameters.clone(),
            },
            RunTarget::Prompt(prompt) => RunAgentRequest {
                agent_id: None,
                file_id: spec.file_id.clone(),
                auto: spec.auto,
                prompt: Some(prompt.clone()),
                parameters: spec.parameters.clone(),
            },
        };

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .bearer_auth(&self.config.api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(MosaicError::Network)?;
                Self::check(response).await
            })
            .await?;

        let started: RunAgentResponse = response.json().await?;
        info!("Started run {} for file {}", started.agent_run_id, spec.file_id);
        Ok(started.agent_run_id)
    }

    /// Fetch the current status of a run.
    pub async fn get_run(&self, run_id: &RunId) -> MosaicResult<RunSnapshot> {
        let url = format!(
            "{}/get-agent-run-simple/{}",
            self.config.base_url,
            run_id.as_str()
        );

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .get(&url)
                    .bearer_auth(&self.config.api_key)
                    .send()
                    .await
                    .map_err(MosaicError::Network)?;
                Self::check(response).await
            })
            .await?;

        Ok(response.json().await?)
    }

    /// Fetch the downloadable outputs of a run.
    ///
    /// Empty until the run succeeds; callers decide whether that is an error.
    pub async fn get_run_outputs(&self, run_id: &RunId) -> MosaicResult<Vec<RunOutput>> {
        let url = format!(
            "{}/get-agent-run-outputs/{}",
            self.config.base_url,
            run_id.as_str()
        );

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .get(&url)
                    .bearer_auth(&self.config.api_key)
                    .send()
                    .await
                    .map_err(MosaicError::Network)?;
                Self::check(response).await
            })
            .await?;

        let listed: RunOutputsResponse = response.json().await?;
        Ok(listed.outputs)
    }

    // =========================================================================
    // Downloads
    // =========================================================================

    /// Stream a pre-signed download URL into a local file.
    pub async fn download_to_file(&self, download_url: &str, dest: &Path) -> MosaicResult<u64> {
        let response = self
            .http
            .get(download_url)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MosaicError::from_status(status, body));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest).await?;
        let mut written: u64 = 0;
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!("Downloaded {} bytes to {}", written, dest.display());
        Ok(written)
    }

    /// Fetch a pre-signed download URL fully into memory.
    pub async fn download_bytes(&self, download_url: &str) -> MosaicResult<Vec<u8>> {
        let response = self
            .http
            .get(download_url)
            .timeout(self.config.transfer_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MosaicError::from_status(status, body));
        }

        let mut bytes: Vec<u8> = Vec::new();
        let mut response = response;
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn check(response: reqwest::Response) -> MosaicResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(MosaicError::from_status(status, body))
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> MosaicResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = MosaicResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Mosaic request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| MosaicError::InvalidResponse("retry loop exhausted".to_string())))
    }
}
