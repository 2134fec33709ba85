//! Service seam used by the session layer
//!
//! The polling engine, submission workflow and listing cache only need the
//! three calls below. They are written against this trait so that they can be
//! driven by [`ImageServiceClient`] in production and by scripted fakes in
//! tests.

use async_trait::async_trait;
use imgflow_core::domain::job::Job;
use imgflow_core::domain::operation::Operation;
use imgflow_core::domain::upload::ImageUpload;
use imgflow_core::dto::resource::ListResponse;
use uuid::Uuid;

use crate::ImageServiceClient;
use crate::error::Result;

/// Remote operations the session layer depends on
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Uploads an image with its operations and returns the created job
    async fn submit(&self, upload: &ImageUpload, operations: &[Operation]) -> Result<Job>;

    /// Returns the latest status report for a job
    async fn fetch_status(&self, job_id: Uuid) -> Result<Job>;

    /// Returns one page of the image collection
    async fn list_resources(&self, limit: u64, offset: u64) -> Result<ListResponse>;
}

#[async_trait]
impl ImageService for ImageServiceClient {
    async fn submit(&self, upload: &ImageUpload, operations: &[Operation]) -> Result<Job> {
        ImageServiceClient::submit(self, upload, operations).await
    }

    async fn fetch_status(&self, job_id: Uuid) -> Result<Job> {
        ImageServiceClient::fetch_status(self, job_id).await
    }

    async fn list_resources(&self, limit: u64, offset: u64) -> Result<ListResponse> {
        ImageServiceClient::list_resources(self, limit, offset).await
    }
}

#[async_trait]
impl<S: ImageService + ?Sized> ImageService for std::sync::Arc<S> {
    async fn submit(&self, upload: &ImageUpload, operations: &[Operation]) -> Result<Job> {
        (**self).submit(upload, operations).await
    }

    async fn fetch_status(&self, job_id: Uuid) -> Result<Job> {
        (**self).fetch_status(job_id).await
    }

    async fn list_resources(&self, limit: u64, offset: u64) -> Result<ListResponse> {
        (**self).list_resources(limit, offset).await
    }
}
