//! ID resolver module
//!
//! Lets users pass a short, unambiguous prefix instead of a full job UUID.
//! Prefixes are resolved against the remote image collection.

use anyhow::{Context, Result, anyhow};
use imgflow_client::ImageService;
use uuid::Uuid;

/// Records fetched per listing request while resolving a prefix
const RESOLVE_PAGE_SIZE: u64 = 100;

/// Identifier that can be either a full UUID or an unambiguous prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrPrefix {
    Full(Uuid),
    Prefix(String),
}

impl IdOrPrefix {
    /// Parses as a full UUID first, otherwise keeps the input as a prefix
    pub fn parse(input: &str) -> Self {
        match Uuid::parse_str(input) {
            Ok(uuid) => IdOrPrefix::Full(uuid),
            Err(_) => IdOrPrefix::Prefix(input.trim().to_lowercase()),
        }
    }
}

impl std::fmt::Display for IdOrPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdOrPrefix::Full(uuid) => write!(f, "{}", uuid),
            IdOrPrefix::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}

/// Resolve a job ID or prefix to a full UUID
///
/// A full UUID is returned as is, without any request. A prefix is matched
/// against every job in the collection, fetched page by page until the
/// service returns a short page. The reported total is not trusted, since some
/// services report only the page length there.
///
/// # Errors
/// Returns an error if:
/// - The prefix is empty
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - A listing request fails
pub async fn resolve_job_id<S>(service: &S, input: &str) -> Result<Uuid>
where
    S: ImageService + ?Sized,
{
    let prefix = match IdOrPrefix::parse(input) {
        IdOrPrefix::Full(uuid) => return Ok(uuid),
        IdOrPrefix::Prefix(prefix) => prefix,
    };

    if prefix.is_empty() {
        return Err(anyhow!("Job ID cannot be empty"));
    }

    let mut ids = Vec::new();
    let mut offset = 0;
    loop {
        let page = service
            .list_resources(RESOLVE_PAGE_SIZE, offset)
            .await
            .context("Failed to fetch jobs for ID resolution")?;

        let fetched = page.images.len() as u64;
        ids.extend(page.images.into_iter().map(|r| r.id));
        offset += fetched;

        if fetched < RESOLVE_PAGE_SIZE {
            break;
        }
    }

    match_prefix(&ids, &prefix)
}

fn match_prefix(ids: &[Uuid], prefix: &str) -> Result<Uuid> {
    let matches: Vec<&Uuid> = ids
        .iter()
        .filter(|id| id.to_string().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("No job found with ID starting with '{}'", prefix)),
        [id] => Ok(**id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|id| id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple jobs: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use imgflow_client::{ErrorEnvelope, ImageServiceClient};
    use imgflow_core::domain::job::{Job, JobStatus};
    use imgflow_core::domain::operation::Operation;
    use imgflow_core::domain::resource::ResourceRecord;
    use imgflow_core::domain::upload::ImageUpload;
    use imgflow_core::dto::resource::ListResponse;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Collection whose listing reports the page length as the total
    struct PagedCollection {
        ids: Vec<Uuid>,
        list_calls: AtomicU32,
    }

    #[async_trait]
    impl ImageService for PagedCollection {
        async fn submit(
            &self,
            _upload: &ImageUpload,
            _operations: &[Operation],
        ) -> imgflow_client::Result<Job> {
            Err(ErrorEnvelope::server("not supported"))
        }

        async fn fetch_status(&self, _job_id: Uuid) -> imgflow_client::Result<Job> {
            Err(ErrorEnvelope::server("not supported"))
        }

        async fn list_resources(
            &self,
            limit: u64,
            offset: u64,
        ) -> imgflow_client::Result<ListResponse> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let images: Vec<ResourceRecord> = self
                .ids
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .map(|id| ResourceRecord {
                    id: *id,
                    filename: format!("{}.jpg", id),
                    size_bytes: 1024,
                    mime_type: None,
                    created_at: Utc::now(),
                    status: JobStatus::Completed,
                })
                .collect();
            Ok(ListResponse {
                total_count: images.len() as u64,
                images,
                limit: Some(limit),
                offset: Some(offset),
            })
        }
    }

    #[test]
    fn test_parse_full_and_prefix() {
        let id = Uuid::new_v4();
        assert_eq!(IdOrPrefix::parse(&id.to_string()), IdOrPrefix::Full(id));
        assert_eq!(
            IdOrPrefix::parse(" 6F1C "),
            IdOrPrefix::Prefix("6f1c".to_string())
        );
    }

    #[test]
    fn test_match_prefix() {
        let a = Uuid::parse_str("6f1c0a8e-2b7d-4c0e-9a59-0d3c2f1e8b11").unwrap();
        let b = Uuid::parse_str("6f2d0a8e-2b7d-4c0e-9a59-0d3c2f1e8b11").unwrap();
        let ids = [a, b];

        assert_eq!(match_prefix(&ids, "6f1").unwrap(), a);
        assert!(
            match_prefix(&ids, "6f")
                .unwrap_err()
                .to_string()
                .contains("Ambiguous")
        );
        assert!(match_prefix(&ids, "ff").is_err());
    }

    #[tokio::test]
    async fn test_prefix_found_past_first_page() {
        let target = Uuid::parse_str("abcdef01-2b7d-4c0e-9a59-0d3c2f1e8b11").unwrap();
        let mut ids: Vec<Uuid> = (0..150u128)
            .map(|i| Uuid::from_u128(0x1000_0000_0000_0000_0000_0000_0000_0000 + i))
            .collect();
        ids.push(target);
        let service = PagedCollection {
            ids,
            list_calls: AtomicU32::new(0),
        };

        assert_eq!(resolve_job_id(&service, "abcdef").await.unwrap(), target);
        assert_eq!(service.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_full_uuid_needs_no_request() {
        // Nothing listens here; a request would fail
        let client = ImageServiceClient::new("http://127.0.0.1:9");
        let id = Uuid::new_v4();
        assert_eq!(resolve_job_id(&client, &id.to_string()).await.unwrap(), id);
    }
}
