//! Listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::resource::ResourceRecord;

/// One page of the image collection
///
/// Older service builds report the total under `count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub images: Vec<ResourceRecord>,
    #[serde(alias = "count")]
    pub total_count: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_alias() {
        let response: ListResponse = serde_json::from_value(json!({
            "images": [{
                "id": "6f1c0a8e-2b7d-4c0e-9a59-0d3c2f1e8b11",
                "filename": "cat.jpg",
                "size": 5242880,
                "mime_type": "image/jpeg",
                "created_at": "2026-01-02T03:04:05Z",
                "status": "completed"
            }],
            "count": 31,
            "limit": 12,
            "offset": 0
        }))
        .unwrap();

        assert_eq!(response.total_count, 31);
        assert_eq!(response.images[0].size_bytes, 5_242_880);
    }
}
