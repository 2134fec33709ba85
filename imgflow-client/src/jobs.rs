//! Job-related API endpoints

use crate::ImageServiceClient;
use crate::error::{ErrorEnvelope, Result};
use imgflow_core::domain::job::Job;
use imgflow_core::domain::operation::{Operation, ResourceVariant};
use imgflow_core::domain::upload::ImageUpload;
use imgflow_core::dto::job::{AccessUrl, DeleteResponse, StatusResponse, SubmitResponse};
use reqwest::multipart::{Form, Part};
use tracing::debug;
use uuid::Uuid;

/// Downloaded bytes of a stored rendition
#[derive(Debug, Clone)]
pub struct ResourceBytes {
    /// `Content-Type` reported by the service
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageServiceClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Upload an image together with the operations to run on it
    ///
    /// Sends a multipart body with an `image` part and an `operations` part
    /// holding the JSON descriptor `[{type, parameters}, ...]`.
    ///
    /// # Arguments
    /// * `upload` - The image to upload
    /// * `operations` - Ordered, non-empty list of operations
    ///
    /// # Returns
    /// The job created by the service, with `requested_operations` attached
    ///
    /// # Example
    /// ```no_run
    /// # use imgflow_client::ImageServiceClient;
    /// # use imgflow_core::domain::operation::Operation;
    /// # use imgflow_core::domain::upload::ImageUpload;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ImageServiceClient::new("http://localhost:8080");
    /// let upload = ImageUpload::new("cat.jpg", "image/jpeg", vec![0xFF, 0xD8]);
    /// let job = client
    ///     .submit(&upload, &[Operation::thumbnail(128), Operation::resize(800, 600, true)])
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, upload: &ImageUpload, operations: &[Operation]) -> Result<Job> {
        if upload.bytes.is_empty() {
            return Err(ErrorEnvelope::validation("image payload is empty"));
        }
        if operations.is_empty() {
            return Err(ErrorEnvelope::validation(
                "at least one operation is required",
            ));
        }

        let descriptor = serde_json::to_string(operations).map_err(|e| {
            ErrorEnvelope::validation(format!("Failed to encode operations: {}", e))
        })?;

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.mime_type)
            .map_err(|e| {
                ErrorEnvelope::validation(format!(
                    "invalid MIME type '{}': {}",
                    upload.mime_type, e
                ))
            })?;

        let form = Form::new()
            .part("image", part)
            .text("operations", descriptor);

        debug!(
            "Submitting {} ({} bytes) with {} operation(s)",
            upload.filename,
            upload.size(),
            operations.len()
        );

        let url = self.api_url("/images");
        let response = self.client.post(&url).multipart(form).send().await?;

        let accepted: SubmitResponse = self.handle_response(response).await?;
        Ok(accepted.into_job(operations.to_vec()))
    }

    /// Get the processing status of a job
    ///
    /// The returned job has no `requested_operations`; merge it into the
    /// submitted job with [`Job::merge`].
    ///
    /// # Arguments
    /// * `job_id` - The job UUID
    pub async fn fetch_status(&self, job_id: Uuid) -> Result<Job> {
        let url = self.api_url(&format!("/images/{}/status", job_id));
        let response = self.client.get(&url).send().await?;

        let report: StatusResponse = self.handle_response(response).await?;
        Ok(report.into_job(job_id))
    }

    /// Build the URL of a stored rendition without performing any I/O
    ///
    /// # Arguments
    /// * `job_id` - The job UUID
    /// * `variant` - `original` or the operation whose output is wanted
    pub fn resource_url(&self, job_id: Uuid, variant: ResourceVariant) -> String {
        self.api_url(&format!("/images/{}?operation={}", job_id, variant))
    }

    /// Download the bytes of a stored rendition
    ///
    /// # Arguments
    /// * `job_id` - The job UUID
    /// * `variant` - `original` or the operation whose output is wanted
    pub async fn fetch_resource(
        &self,
        job_id: Uuid,
        variant: ResourceVariant,
    ) -> Result<ResourceBytes> {
        let url = self.resource_url(job_id, variant);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        Ok(ResourceBytes {
            content_type,
            bytes,
        })
    }

    /// Request a temporary download link for a stored rendition
    ///
    /// # Arguments
    /// * `job_id` - The job UUID
    /// * `variant` - `original` or the operation whose output is wanted
    /// * `expiry_seconds` - Requested validity, must be greater than 0
    pub async fn fetch_access_url(
        &self,
        job_id: Uuid,
        variant: ResourceVariant,
        expiry_seconds: u64,
    ) -> Result<AccessUrl> {
        if expiry_seconds == 0 {
            return Err(ErrorEnvelope::validation(
                "expiry must be greater than 0 seconds",
            ));
        }

        let url = self.api_url(&format!(
            "/images/{}/url?operation={}&expiry={}",
            job_id, variant, expiry_seconds
        ));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Delete a job and all of its renditions
    ///
    /// Removal is idempotent: a job the service no longer knows is reported
    /// as removed.
    ///
    /// # Arguments
    /// * `job_id` - The job UUID to delete
    pub async fn remove(&self, job_id: Uuid) -> Result<DeleteResponse> {
        let url = self.api_url(&format!("/images/{}", job_id));
        let response = self.client.delete(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("Job {} already removed", job_id);
            return Ok(DeleteResponse {
                success: true,
                message: "already removed".to_string(),
                id: Some(job_id.to_string()),
            });
        }

        self.handle_response(response).await
    }
}
