//! Scripted [`ImageService`] used by the session tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use imgflow_client::{ErrorEnvelope, ImageService, Result};
use imgflow_core::domain::job::{Job, JobStatus};
use imgflow_core::domain::operation::Operation;
use imgflow_core::domain::resource::ResourceRecord;
use imgflow_core::domain::upload::ImageUpload;
use imgflow_core::dto::resource::ListResponse;
use uuid::Uuid;

/// A status report as the service would send it
pub(crate) fn report(status: JobStatus, progress: u8, processed: u32) -> Result<Job> {
    Ok(Job {
        id: Uuid::nil(),
        status,
        progress,
        processed_operations: processed,
        total_operations: 0,
        requested_operations: Vec::new(),
        error_message: None,
    })
}

pub(crate) fn record(filename: &str, status: JobStatus) -> ResourceRecord {
    ResourceRecord {
        id: Uuid::new_v4(),
        filename: filename.to_string(),
        size_bytes: 2048,
        mime_type: Some("image/jpeg".to_string()),
        created_at: Utc::now(),
        status,
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    pub job_id: Uuid,
    submit_error: Option<ErrorEnvelope>,
    /// The last entry repeats once the queue is down to one
    statuses: Mutex<VecDeque<Result<Job>>>,
    records: Vec<ResourceRecord>,
    /// Report the page length as the total, as older services do
    page_length_total: bool,
    delays: HashMap<u64, Duration>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
    list_calls: AtomicU32,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            job_id: Uuid::new_v4(),
            ..Self::default()
        }
    }

    pub fn with_statuses(self, statuses: Vec<Result<Job>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..self
        }
    }

    pub fn failing_submit(self, error: ErrorEnvelope) -> Self {
        Self {
            submit_error: Some(error),
            ..self
        }
    }

    pub fn with_records(self, records: Vec<ResourceRecord>) -> Self {
        Self { records, ..self }
    }

    pub fn reporting_page_length(self) -> Self {
        Self {
            page_length_total: true,
            ..self
        }
    }

    /// Delays list responses for the page starting at `offset`
    pub fn with_delay(mut self, offset: u64, delay: Duration) -> Self {
        self.delays.insert(offset, delay);
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for FakeService {
    async fn submit(&self, _upload: &ImageUpload, operations: &[Operation]) -> Result<Job> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &self.submit_error {
            Some(error) => Err(error.clone()),
            None => Ok(Job::submitted(
                self.job_id,
                JobStatus::Queued,
                operations.to_vec(),
            )),
        }
    }

    async fn fetch_status(&self, job_id: Uuid) -> Result<Job> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            }
        };
        let mut job = next.unwrap_or_else(|| report(JobStatus::Queued, 0, 0))?;
        job.id = job_id;
        Ok(job)
    }

    async fn list_resources(&self, limit: u64, offset: u64) -> Result<ListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&offset) {
            tokio::time::sleep(*delay).await;
        }
        let images: Vec<ResourceRecord> = self
            .records
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        let total_count = if self.page_length_total {
            images.len()
        } else {
            self.records.len()
        };
        Ok(ListResponse {
            images,
            total_count: total_count as u64,
            limit: Some(limit),
            offset: Some(offset),
        })
    }
}
